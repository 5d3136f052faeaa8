//! # pemrsa
//!
//! Conversion traits shared by every layer of the RSA key decoding pipeline.
//!
//! Each layer turns one representation into the next:
//! ```text
//! &str → Pem → Block (label + bytes) → Der → ASN1Object → RSAPrivateKey / SubjectPublicKey
//! ```
//!
//! Every step is a [`decoder::Decoder`] implementation, and the reverse direction (used to
//! re-armor decoded keys) is an [`encoder::Encoder`] implementation. The marker traits
//! [`decoder::DecodableFrom`] and [`encoder::EncodableTo`] restrict which pairs of types may be
//! converted, so an unsupported conversion is a compile error rather than a runtime failure.
//!
//! ```ignore
//! use pemrsa::decoder::Decoder;
//! use pemrsa_der::Der;
//! use pemrsa_asn1::ASN1Object;
//!
//! let der: Der = vec![0x30, 0x03, 0x02, 0x01, 0x05].decode()?;
//! let asn1: ASN1Object = der.decode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
