use pemrsa::decoder::{DecodableFrom, Decoder};
use pemrsa::encoder::{EncodableTo, Encoder};
use pemrsa_asn1::{Element, Integer};
use pemrsa_pem::{Label, Pem, ToPem};
use serde::Serialize;

use super::error::{Error, Result};
use crate::error::DecodeError;

/*
RFC 8017 - PKCS #1: RSA Cryptography Specifications

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
    (CONSTRAINED BY {-- version must be multi if otherPrimeInfos present --})

OtherPrimeInfos ::= SEQUENCE SIZE(1..MAX) OF OtherPrimeInfo

OtherPrimeInfo ::= SEQUENCE {
    prime             INTEGER,  -- ri
    exponent          INTEGER,  -- di
    coefficient       INTEGER   -- ti
}
*/

/// PKCS#1 RSAPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    TwoPrime = 0,
    Multi = 1,
}

impl From<Version> for i64 {
    fn from(v: Version) -> Self {
        v as i64
    }
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as i64)
    }
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::TwoPrime),
            1 => Ok(Version::Multi),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        let int = integer(self, "version")?;
        let value = i64::try_from(int).map_err(|_| Error::VersionOutOfRange)?;
        Version::try_from(value)
    }
}

fn integer<'a>(element: &'a Element, field: &'static str) -> Result<&'a Integer> {
    match element {
        Element::Integer(int) => Ok(int),
        other => Err(Error::ExpectedInteger {
            field,
            actual: other.type_name(),
        }),
    }
}

fn positive(element: &Element, field: &'static str) -> Result<Integer> {
    let int = integer(element, field)?;
    if !int.is_positive() {
        return Err(Error::NonPositive(field));
    }
    Ok(int.clone())
}

/// One additional prime of a multi-prime key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherPrimeInfo {
    pub prime: Integer,       // r_i
    pub exponent: Integer,    // d mod (r_i - 1)
    pub coefficient: Integer, // (r_1 * ... * r_(i-1))^-1 mod r_i
}

impl DecodableFrom<Element> for OtherPrimeInfo {}

impl Decoder<Element, OtherPrimeInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OtherPrimeInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                field: "OtherPrimeInfo",
                actual: self.type_name(),
            });
        };
        let [prime, exponent, coefficient] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                field: "OtherPrimeInfo",
                expected: "3",
                actual: elements.len(),
            });
        };
        Ok(OtherPrimeInfo {
            prime: positive(prime, "prime")?,
            exponent: integer(exponent, "exponent")?.clone(),
            coefficient: integer(coefficient, "coefficient")?.clone(),
        })
    }
}

impl EncodableTo<OtherPrimeInfo> for Element {}

impl Encoder<OtherPrimeInfo, Element> for OtherPrimeInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.prime.clone()),
            Element::Integer(self.exponent.clone()),
            Element::Integer(self.coefficient.clone()),
        ]))
    }
}

/// PKCS#1 RSA Private Key structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RSAPrivateKey {
    pub version: Version,
    pub modulus: Integer,          // n
    pub public_exponent: Integer,  // e
    pub private_exponent: Integer, // d
    pub prime1: Integer,           // p
    pub prime2: Integer,           // q
    pub exponent1: Integer,        // d mod (p-1)
    pub exponent2: Integer,        // d mod (q-1)
    pub coefficient: Integer,      // (inverse of q) mod p
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_prime_infos: Vec<OtherPrimeInfo>,
}

impl RSAPrivateKey {
    /// Parse DER bytes holding exactly one RSAPrivateKey.
    pub fn from_der(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        let element = crate::single_element(bytes)?;
        let key: RSAPrivateKey = element.decode()?;
        Ok(key)
    }

    pub fn to_der(&self) -> std::result::Result<Vec<u8>, DecodeError> {
        crate::to_der(self.encode()?)
    }

    /// All primes in order: p, q, then the additional primes.
    pub fn primes(&self) -> Vec<&Integer> {
        [&self.prime1, &self.prime2]
            .into_iter()
            .chain(self.other_prime_infos.iter().map(|info| &info.prime))
            .collect()
    }

    /// CRT exponents in prime order: dP, dQ, then d_i of the additional primes.
    pub fn crt_exponents(&self) -> Vec<&Integer> {
        [&self.exponent1, &self.exponent2]
            .into_iter()
            .chain(self.other_prime_infos.iter().map(|info| &info.exponent))
            .collect()
    }

    /// CRT coefficients: qInv, then t_i of the additional primes.
    pub fn crt_coefficients(&self) -> Vec<&Integer> {
        std::iter::once(&self.coefficient)
            .chain(self.other_prime_infos.iter().map(|info| &info.coefficient))
            .collect()
    }

    /// Key size in bits (RSA modulus bit length)
    pub fn key_size(&self) -> u32 {
        self.modulus.bits() as u32
    }

    pub fn public_key(&self) -> RSAPublicKey {
        RSAPublicKey {
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent.clone(),
        }
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                field: "RSAPrivateKey",
                actual: self.type_name(),
            });
        };

        // Name the container when the payload is another private key syntax.
        match elements.as_slice() {
            [Element::Integer(_), Element::Sequence(_), Element::OctetString(_), ..] => {
                return Err(Error::UnexpectedKeyFormat {
                    found: "PKCS#8 PrivateKeyInfo",
                });
            }
            [Element::Integer(_), Element::OctetString(_), ..] => {
                return Err(Error::UnexpectedKeyFormat {
                    found: "SEC1 ECPrivateKey",
                });
            }
            _ => {}
        }

        let [
            version,
            modulus,
            public_exponent,
            private_exponent,
            prime1,
            prime2,
            exponent1,
            exponent2,
            coefficient,
            rest @ ..,
        ] = elements.as_slice()
        else {
            return Err(Error::InvalidElementCount {
                field: "RSAPrivateKey",
                expected: "9 or 10",
                actual: elements.len(),
            });
        };

        let version: Version = version.decode()?;

        let other_prime_infos = match rest {
            [] => Vec::new(),
            [Element::Sequence(infos)] => {
                if infos.is_empty() {
                    return Err(Error::EmptyOtherPrimeInfos);
                }
                infos
                    .iter()
                    .map(|info| -> Result<OtherPrimeInfo> { info.decode() })
                    .collect::<Result<Vec<_>>>()?
            }
            [other] => {
                return Err(Error::ExpectedSequence {
                    field: "otherPrimeInfos",
                    actual: other.type_name(),
                });
            }
            _ => {
                return Err(Error::InvalidElementCount {
                    field: "RSAPrivateKey",
                    expected: "9 or 10",
                    actual: elements.len(),
                });
            }
        };

        if (version == Version::Multi) == other_prime_infos.is_empty() {
            return Err(Error::VersionMismatch {
                version,
                other_primes: other_prime_infos.len(),
            });
        }

        Ok(RSAPrivateKey {
            version,
            modulus: positive(modulus, "modulus")?,
            public_exponent: positive(public_exponent, "publicExponent")?,
            private_exponent: positive(private_exponent, "privateExponent")?,
            prime1: positive(prime1, "prime1")?,
            prime2: positive(prime2, "prime2")?,
            exponent1: integer(exponent1, "exponent1")?.clone(),
            exponent2: integer(exponent2, "exponent2")?.clone(),
            coefficient: integer(coefficient, "coefficient")?.clone(),
            other_prime_infos,
        })
    }
}

impl EncodableTo<RSAPrivateKey> for Element {}

impl Encoder<RSAPrivateKey, Element> for RSAPrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(Integer::from(self.version)),
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
            Element::Integer(self.private_exponent.clone()),
            Element::Integer(self.prime1.clone()),
            Element::Integer(self.prime2.clone()),
            Element::Integer(self.exponent1.clone()),
            Element::Integer(self.exponent2.clone()),
            Element::Integer(self.coefficient.clone()),
        ];
        if !self.other_prime_infos.is_empty() {
            let infos = self
                .other_prime_infos
                .iter()
                .map(|info| info.encode())
                .collect::<Result<Vec<Element>>>()?;
            elements.push(Element::Sequence(infos));
        }
        Ok(Element::Sequence(elements))
    }
}

/*
RFC 8017 - RSA Public Key

RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

/// PKCS#1 RSA Public Key structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RSAPublicKey {
    pub modulus: Integer,         // n
    pub public_exponent: Integer, // e
}

impl RSAPublicKey {
    /// Parse DER bytes holding exactly one RSAPublicKey.
    pub fn from_der(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        let element = crate::single_element(bytes)?;
        let key: RSAPublicKey = element.decode()?;
        Ok(key)
    }

    pub fn to_der(&self) -> std::result::Result<Vec<u8>, DecodeError> {
        crate::to_der(self.encode()?)
    }

    /// Key size in bits (RSA modulus bit length)
    pub fn key_size(&self) -> u32 {
        self.modulus.bits() as u32
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                field: "RSAPublicKey",
                actual: self.type_name(),
            });
        };
        let [modulus, public_exponent] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                field: "RSAPublicKey",
                expected: "2",
                actual: elements.len(),
            });
        };

        Ok(RSAPublicKey {
            modulus: positive(modulus, "modulus")?,
            public_exponent: positive(public_exponent, "publicExponent")?,
        })
    }
}

impl EncodableTo<RSAPublicKey> for Element {}

impl Encoder<RSAPublicKey, Element> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
        ]))
    }
}

// RSAPublicKey -> PEM encoder
impl ToPem for RSAPublicKey {
    type Error = DecodeError;

    fn pem_label(&self) -> Label {
        Label::RSAPublicKey
    }

    fn to_pem(&self) -> std::result::Result<Pem, Self::Error> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

// RSAPrivateKey -> PEM encoder
impl ToPem for RSAPrivateKey {
    type Error = DecodeError;

    fn pem_label(&self) -> Label {
        Label::RSAPrivateKey
    }

    fn to_pem(&self) -> std::result::Result<Pem, Self::Error> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}
