//! Subject Public Key Info
//!
//! RFC 5280 Section 4.1.2.7
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//! ```
//!
//! This is the payload of a `PUBLIC KEY` PEM block.

use pemrsa::decoder::{DecodableFrom, Decoder};
use pemrsa::encoder::{EncodableTo, Encoder};
use pemrsa_asn1::{BitString, Element};
use serde::Serialize;

use crate::algorithm::{AlgorithmIdentifier, KeyAlgorithm};
use crate::error::{Error, Result};

/// Subject Public Key Info
///
/// Contains the algorithm identifier and the public key itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
        Self {
            algorithm,
            subject_public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        self.algorithm.key_algorithm()
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SubjectPublicKeyInfoExpectedSequence(self.type_name()));
        };

        let [algorithm_elm, public_key_elm] = elements.as_slice() else {
            return Err(Error::SubjectPublicKeyInfoInvalidElementCount(elements.len()));
        };

        let algorithm: AlgorithmIdentifier = algorithm_elm.decode()?;

        let Element::BitString(subject_public_key) = public_key_elm else {
            return Err(Error::SubjectPublicKeyInfoExpectedBitString(
                public_key_elm.type_name(),
            ));
        };

        Ok(SubjectPublicKeyInfo {
            algorithm,
            subject_public_key: subject_public_key.clone(),
        })
    }
}

impl EncodableTo<SubjectPublicKeyInfo> for Element {}

impl Encoder<SubjectPublicKeyInfo, Element> for SubjectPublicKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let algorithm_elm = self.algorithm.encode()?;
        let public_key_elm = Element::BitString(self.subject_public_key.clone());
        Ok(Element::Sequence(vec![algorithm_elm, public_key_elm]))
    }
}
