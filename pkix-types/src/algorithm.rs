//! AlgorithmIdentifier type
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)

use std::fmt::{Display, Formatter};

use pemrsa::decoder::{DecodableFrom, Decoder};
use pemrsa::encoder::{EncodableTo, Encoder};
use pemrsa_asn1::{Element, ObjectIdentifier};
use serde::{Serialize, ser::SerializeStruct};

use crate::OidName;
use crate::error::{Error, Result};

pub const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
pub const OID_ID_DSA: &str = "1.2.840.10040.4.1";
pub const OID_ED25519: &str = "1.3.101.112";
pub const OID_ED448: &str = "1.3.101.113";

const OID_SECP256R1: &str = "1.2.840.10045.3.1.7";
const OID_SECP384R1: &str = "1.3.132.0.34";
const OID_SECP521R1: &str = "1.3.132.0.35";

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: Field not present (OPTIONAL field omitted, e.g. Ed25519)
/// - Some(AlgorithmParameters::Null): Explicit NULL value (RSA)
/// - Some(AlgorithmParameters::Other(Element)): Any other ASN.1 element (EC curve OID, DSA domain)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    /// Explicit NULL (05 00)
    Null,
    Other(Element),
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AlgorithmParameters::Null => serializer.serialize_str("NULL"),
            AlgorithmParameters::Other(Element::ObjectIdentifier(oid)) => {
                let curve = match oid.to_string().as_str() {
                    OID_SECP256R1 => Some("secp256r1"),
                    OID_SECP384R1 => Some("secp384r1"),
                    OID_SECP521R1 => Some("secp521r1"),
                    _ => None,
                };
                match curve {
                    Some(name) => serializer.serialize_str(name),
                    None => oid.serialize(serializer),
                }
            }
            AlgorithmParameters::Other(Element::Sequence(elements)) => {
                // DSA domain parameters: only the shape is reported
                let mut state = serializer.serialize_struct("Sequence", 1)?;
                state.serialize_field("element_count", &elements.len())?;
                state.end()
            }
            AlgorithmParameters::Other(other) => serializer.serialize_str(other.type_name()),
        }
    }
}

/// Key algorithm named by a SubjectPublicKeyInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeyAlgorithm {
    /// RSA encryption
    Rsa,
    /// Elliptic Curve (ECDSA/ECDH)
    Ec,
    /// Ed25519 (EdDSA)
    Ed25519,
    /// Ed448 (EdDSA)
    Ed448,
    /// DSA
    Dsa,
    /// Unknown or unsupported algorithm
    Unknown,
}

impl KeyAlgorithm {
    /// Returns the OID string for this algorithm, if known.
    #[must_use]
    pub fn oid(&self) -> Option<&'static str> {
        match self {
            KeyAlgorithm::Rsa => Some(OID_RSA_ENCRYPTION),
            KeyAlgorithm::Ec => Some(OID_EC_PUBLIC_KEY),
            KeyAlgorithm::Ed25519 => Some(OID_ED25519),
            KeyAlgorithm::Ed448 => Some(OID_ED448),
            KeyAlgorithm::Dsa => Some(OID_ID_DSA),
            KeyAlgorithm::Unknown => None,
        }
    }

    /// Returns a human-readable name for this algorithm.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::Ec => "EC",
            KeyAlgorithm::Ed25519 => "Ed25519",
            KeyAlgorithm::Ed448 => "Ed448",
            KeyAlgorithm::Dsa => "DSA",
            KeyAlgorithm::Unknown => "Unknown",
        }
    }
}

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&ObjectIdentifier> for KeyAlgorithm {
    fn from(oid: &ObjectIdentifier) -> Self {
        match oid.to_string().as_str() {
            OID_RSA_ENCRYPTION => KeyAlgorithm::Rsa,
            OID_EC_PUBLIC_KEY => KeyAlgorithm::Ec,
            OID_ED25519 => KeyAlgorithm::Ed25519,
            OID_ED448 => KeyAlgorithm::Ed448,
            OID_ID_DSA => KeyAlgorithm::Dsa,
            _ => KeyAlgorithm::Unknown,
        }
    }
}

/// Algorithm Identifier
///
/// [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2):
/// ```asn1
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    /// Algorithm OID
    pub algorithm: ObjectIdentifier,
    /// Optional parameters
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    /// Create a new AlgorithmIdentifier with algorithm OID only
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    /// Create a new AlgorithmIdentifier with parameters
    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    /// Get the algorithm OID
    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    /// Get the parameters
    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::from(&self.algorithm)
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        match self.key_algorithm() {
            KeyAlgorithm::Rsa => Some("rsaEncryption"),
            KeyAlgorithm::Ec => Some("ecPublicKey"),
            KeyAlgorithm::Ed25519 => Some("Ed25519"),
            KeyAlgorithm::Ed448 => Some("Ed448"),
            KeyAlgorithm::Dsa => Some("id-dsa"),
            KeyAlgorithm::Unknown => None,
        }
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 2)?;

        // Use human-readable name if available, otherwise use OID
        let oid_string = self.algorithm.to_string();
        let algorithm_display = self.oid_name().unwrap_or(&oid_string);
        state.serialize_field("algorithm", &algorithm_display)?;

        if let Some(ref params) = self.parameters {
            state.serialize_field("parameters", params)?;
        }
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence(self.type_name()));
        };

        let algorithm = match elements.first() {
            Some(Element::ObjectIdentifier(oid)) => oid.clone(),
            Some(other) => return Err(Error::AlgorithmIdentifierExpectedOid(other.type_name())),
            None => return Err(Error::AlgorithmIdentifierEmpty),
        };

        if elements.len() > 2 {
            return Err(Error::AlgorithmIdentifierInvalidElementCount(elements.len()));
        }

        let parameters = match elements.get(1) {
            Some(Element::Null) => Some(AlgorithmParameters::Null),
            Some(other) => Some(AlgorithmParameters::Other(other.clone())),
            None => None,
        };

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let params_elem = self.parameters.as_ref().map(|params| match params {
            AlgorithmParameters::Null => Element::Null,
            AlgorithmParameters::Other(element) => element.clone(),
        });

        let elements: Vec<_> = std::iter::once(Element::ObjectIdentifier(self.algorithm.clone()))
            .chain(params_elem)
            .collect();

        Ok(Element::Sequence(elements))
    }
}
