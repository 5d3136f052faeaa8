//! Error taxonomy of the key decoders.
//!
//! Every failure falls into one of three kinds (see [`ErrorKind`]): the armor is missing or
//! carries the wrong label, the payload does not match the expected ASN.1 schema, or the payload
//! is a well-formed public key for an algorithm other than RSA.

use pemrsa_pkix_types::KeyAlgorithm;
use serde::Serialize;
use thiserror::Error;

pub(crate) const PRIVATE_KEY_FORMAT: &str = "invalid RSA private key format";
pub(crate) const PRIVATE_KEY_DECODE: &str = "failed to parse RSA private key";
pub(crate) const PUBLIC_KEY_FORMAT: &str = "invalid public key format";
pub(crate) const PUBLIC_KEY_DECODE: &str = "failed to parse public key";

#[derive(Debug, Error)]
pub enum Error {
    /// No armored block was found, or its label is not the one the decoder expects.
    #[error("{0}")]
    Format(&'static str),

    /// The label matched but the payload is not the expected structure.
    #[error("{context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: DecodeError,
    },

    /// The payload is a public key, but not an RSA one.
    #[error("parsed key is not an RSA public key")]
    TypeMismatch(KeyAlgorithm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    Decode,
    TypeMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format(_) => ErrorKind::Format,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
        }
    }
}

/// Failure in the DER/ASN.1 layers underneath a key structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("DER error: {0}")]
    Der(#[from] pemrsa_der::error::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] pemrsa_asn1::error::Error),

    #[error(transparent)]
    PkixTypes(#[from] pemrsa_pkix_types::Error),

    #[error(transparent)]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("no data")]
    Empty,

    #[error("trailing data: {0} top-level elements")]
    TrailingData(usize),

    #[error("RSA key parameters must be NULL, got {0}")]
    RsaParameters(&'static str),

    #[error("RSA key bit string has {0} unused bits")]
    UnusedBits(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
