//! RSA keys from PEM text.
//!
//! [`parse_rsa_private_key_from_pem`] reads a PKCS#1 `RSA PRIVATE KEY` block and
//! [`parse_rsa_public_key_from_pem`] reads an X.509 `PUBLIC KEY` (SubjectPublicKeyInfo) block.
//! Both are pure functions and may be called from any number of threads.

pub mod error;
pub mod pkcs1;
pub mod private_key;
pub mod public_key;

use pemrsa::decoder::Decoder;
use pemrsa::encoder::Encoder;
use pemrsa_asn1::{ASN1Object, Element};
use pemrsa_der::Der;
use tracing::trace;

pub use error::{DecodeError, Error, ErrorKind, Result};
pub use pkcs1::{OtherPrimeInfo, RSAPrivateKey, RSAPublicKey, Version};
pub use private_key::parse_rsa_private_key_from_pem;
pub use public_key::{SubjectPublicKey, parse_rsa_public_key_from_pem};

/// Decodes DER bytes that must hold exactly one top-level element.
pub(crate) fn single_element(bytes: &[u8]) -> std::result::Result<Element, DecodeError> {
    let der: Der = bytes.decode()?;
    let asn1_obj: ASN1Object = der.decode()?;
    trace!(
        len = bytes.len(),
        elements = asn1_obj.elements().len(),
        "decoded DER payload"
    );
    match asn1_obj.elements() {
        [] => Err(DecodeError::Empty),
        [element] => Ok(element.clone()),
        elements => Err(DecodeError::TrailingData(elements.len())),
    }
}

/// Encodes one element as DER bytes.
pub(crate) fn to_der(element: Element) -> std::result::Result<Vec<u8>, DecodeError> {
    let der: Der = ASN1Object::new(vec![element]).encode()?;
    Ok(der.encode()?)
}

#[cfg(test)]
pub(crate) mod test_util {
    use pemrsa_pem::{Label, Pem};

    /// `depth` SEQUENCEs wrapped around a NULL, armored under `label`.
    pub(crate) fn nested_sequences_pem(label: Label, depth: usize) -> String {
        let der = (0..depth).fold(vec![0x05, 0x00], |inner, _| {
            let len = inner.len();
            let mut out = vec![0x30];
            match len {
                0..=0x7f => out.push(len as u8),
                0x80..=0xff => out.extend([0x81, len as u8]),
                _ => out.extend([0x82, (len >> 8) as u8, len as u8]),
            }
            out.extend(inner);
            out
        });
        Pem::from_bytes(label, &der).to_string()
    }
}
