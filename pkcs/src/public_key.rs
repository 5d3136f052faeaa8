//! Public keys wrapped in an X.509 SubjectPublicKeyInfo.
//!
//! A `PUBLIC KEY` block may hold a key for any algorithm. [`SubjectPublicKey`] decodes the
//! RSA case fully and keeps every other algorithm as its raw SubjectPublicKeyInfo so callers
//! can report what they found. [`parse_rsa_public_key_from_pem`] narrows the result to RSA.

use pemrsa::decoder::Decoder;
use pemrsa::encoder::Encoder;
use pemrsa_asn1::{BitString, Element, ObjectIdentifier};
use pemrsa_pem::{Label, Pem, ToPem};
use pemrsa_pkix_types::algorithm::OID_RSA_ENCRYPTION;
use pemrsa_pkix_types::{
    AlgorithmIdentifier, AlgorithmParameters, KeyAlgorithm, SubjectPublicKeyInfo,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{DecodeError, Error, PUBLIC_KEY_DECODE, PUBLIC_KEY_FORMAT, Result};
use crate::pkcs1::RSAPublicKey;

/// Public key decoded from a SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "algorithm", content = "key")]
pub enum SubjectPublicKey {
    Rsa(RSAPublicKey),
    Other(KeyAlgorithm, SubjectPublicKeyInfo),
}

impl SubjectPublicKey {
    /// Parse DER bytes holding exactly one SubjectPublicKeyInfo.
    pub fn from_der(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        let element = crate::single_element(bytes)?;
        let spki: SubjectPublicKeyInfo = element.decode()?;
        SubjectPublicKey::try_from(&spki)
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            SubjectPublicKey::Rsa(_) => KeyAlgorithm::Rsa,
            SubjectPublicKey::Other(algorithm, _) => *algorithm,
        }
    }

    fn to_spki(&self) -> std::result::Result<SubjectPublicKeyInfo, DecodeError> {
        match self {
            SubjectPublicKey::Rsa(key) => {
                let oid: ObjectIdentifier = OID_RSA_ENCRYPTION.parse()?;
                let algorithm = AlgorithmIdentifier::new_with_params(oid, AlgorithmParameters::Null);
                Ok(SubjectPublicKeyInfo::new(
                    algorithm,
                    BitString::new(0, key.to_der()?),
                ))
            }
            SubjectPublicKey::Other(_, spki) => Ok(spki.clone()),
        }
    }
}

impl TryFrom<&SubjectPublicKeyInfo> for SubjectPublicKey {
    type Error = DecodeError;

    fn try_from(spki: &SubjectPublicKeyInfo) -> std::result::Result<Self, Self::Error> {
        let algorithm = spki.key_algorithm();
        if algorithm != KeyAlgorithm::Rsa {
            return Ok(SubjectPublicKey::Other(algorithm, spki.clone()));
        }

        // rsaEncryption carries NULL parameters.
        match spki.algorithm().parameters() {
            Some(AlgorithmParameters::Null) => {}
            None => return Err(DecodeError::RsaParameters("absent")),
            Some(AlgorithmParameters::Other(element)) => {
                return Err(DecodeError::RsaParameters(element.type_name()));
            }
        }

        let bits = spki.subject_public_key();
        if bits.unused_bits() != 0 {
            return Err(DecodeError::UnusedBits(bits.unused_bits()));
        }
        Ok(SubjectPublicKey::Rsa(RSAPublicKey::from_der(bits.as_bytes())?))
    }
}

impl TryFrom<SubjectPublicKey> for RSAPublicKey {
    type Error = Error;

    fn try_from(key: SubjectPublicKey) -> Result<Self> {
        match key {
            SubjectPublicKey::Rsa(key) => Ok(key),
            SubjectPublicKey::Other(algorithm, _) => Err(Error::TypeMismatch(algorithm)),
        }
    }
}

impl ToPem for SubjectPublicKey {
    type Error = DecodeError;

    fn pem_label(&self) -> Label {
        Label::PublicKey
    }

    fn to_pem(&self) -> std::result::Result<Pem, Self::Error> {
        let element: Element = self.to_spki()?.encode()?;
        Ok(Pem::from_bytes(self.pem_label(), &crate::to_der(element)?))
    }
}

/// Parse the first PEM block of `text` as an RSA key inside a `PUBLIC KEY` block.
///
/// Fails with [`Error::Format`] when no block is found or its label is not `PUBLIC KEY`,
/// with [`Error::Decode`] when the payload is not a valid SubjectPublicKeyInfo, and with
/// [`Error::TypeMismatch`] when the key belongs to another algorithm.
pub fn parse_rsa_public_key_from_pem(text: &str) -> Result<RSAPublicKey> {
    let block = match pemrsa_pem::unwrap(text) {
        Ok(block) => block,
        Err(err) => {
            debug!(error = %err, "no usable PEM block for public key");
            return Err(Error::Format(PUBLIC_KEY_FORMAT));
        }
    };
    if block.label() != Label::PublicKey {
        debug!(label = %block.label(), "unexpected PEM label for public key");
        return Err(Error::Format(PUBLIC_KEY_FORMAT));
    }

    let key = SubjectPublicKey::from_der(block.payload()).map_err(|source| Error::Decode {
        context: PUBLIC_KEY_DECODE,
        source,
    })?;
    debug!(algorithm = %key.key_algorithm(), "parsed public key");
    RSAPublicKey::try_from(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parse_rsa_private_key_from_pem;
    use pemrsa_asn1::Integer;
    use rand::rngs::OsRng;
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::traits::PublicKeyParts;
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use rstest::rstest;

    const RSA_1024_PRIVATE_KEY: &str = include_str!("../../testdata/keys/rsa1024_private.pem");
    const RSA_1024_PUBLIC_KEY: &str = include_str!("../../testdata/keys/rsa1024_public.pem");
    const RSA_1024_PKCS1_PUBLIC_KEY: &str =
        include_str!("../../testdata/keys/rsa1024_pkcs1_public.pem");
    const RSA_2048_PRIVATE_KEY: &str = include_str!("../../testdata/keys/rsa2048_private.pem");
    const RSA_2048_PUBLIC_KEY: &str = include_str!("../../testdata/keys/rsa2048_public.pem");
    const RSA_2048_3PRIME_PRIVATE_KEY: &str =
        include_str!("../../testdata/keys/rsa2048_3prime_private.pem");
    const RSA_2048_3PRIME_PUBLIC_KEY: &str =
        include_str!("../../testdata/keys/rsa2048_3prime_public.pem");
    const EC_P256_PUBLIC_KEY: &str = include_str!("../../testdata/keys/ec_p256_public.pem");
    const ED25519_PUBLIC_KEY: &str = include_str!("../../testdata/keys/ed25519_public.pem");

    fn spki_pem(spki: &SubjectPublicKeyInfo) -> String {
        let element: Element = spki.encode().unwrap();
        let der = crate::to_der(element).unwrap();
        Pem::from_bytes(Label::PublicKey, &der).to_string()
    }

    fn rsa_spki(parameters: Option<AlgorithmParameters>, key: BitString) -> SubjectPublicKeyInfo {
        let oid: ObjectIdentifier = OID_RSA_ENCRYPTION.parse().unwrap();
        let algorithm = match parameters {
            Some(parameters) => AlgorithmIdentifier::new_with_params(oid, parameters),
            None => AlgorithmIdentifier::new(oid),
        };
        SubjectPublicKeyInfo::new(algorithm, key)
    }

    fn small_key_der() -> Vec<u8> {
        RSAPublicKey {
            modulus: Integer::from(3233i64),
            public_exponent: Integer::from(17i64),
        }
        .to_der()
        .unwrap()
    }

    #[rstest]
    #[case(RSA_1024_PUBLIC_KEY, RSA_1024_PRIVATE_KEY, 1024)]
    #[case(RSA_2048_PUBLIC_KEY, RSA_2048_PRIVATE_KEY, 2048)]
    #[case(RSA_2048_3PRIME_PUBLIC_KEY, RSA_2048_3PRIME_PRIVATE_KEY, 2048)]
    fn test_parse_fixture_matches_private_key(
        #[case] public_pem: &str,
        #[case] private_pem: &str,
        #[case] expected_bits: u32,
    ) {
        let public_key = parse_rsa_public_key_from_pem(public_pem).unwrap();
        let private_key = parse_rsa_private_key_from_pem(private_pem).unwrap();

        assert_eq!(expected_bits, public_key.key_size());
        assert_eq!(private_key.public_key(), public_key);
    }

    #[rstest]
    #[case(RSA_1024_PUBLIC_KEY)]
    #[case(RSA_2048_PUBLIC_KEY)]
    fn test_to_pem_matches_openssl(#[case] pem_str: &str) {
        let key = SubjectPublicKey::Rsa(parse_rsa_public_key_from_pem(pem_str).unwrap());
        assert_eq!(pem_str.trim_end(), key.to_pem().unwrap().to_string());
    }

    #[test]
    fn test_parse_generated_key() {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let public_key = RsaPublicKey::from(&private_key);
        let pem = public_key.to_public_key_pem(LineEnding::LF).unwrap();

        let key = parse_rsa_public_key_from_pem(&pem).unwrap();

        assert_eq!(2048, key.key_size());
        assert_eq!(
            Integer::from_unsigned_bytes_be(&public_key.n().to_bytes_be()),
            key.modulus
        );
        assert_eq!(
            Integer::from_unsigned_bytes_be(&public_key.e().to_bytes_be()),
            key.public_exponent
        );
    }

    #[rstest]
    #[case(EC_P256_PUBLIC_KEY, KeyAlgorithm::Ec)]
    #[case(ED25519_PUBLIC_KEY, KeyAlgorithm::Ed25519)]
    fn test_parse_rejects_other_algorithms(#[case] pem_str: &str, #[case] expected: KeyAlgorithm) {
        let err = parse_rsa_public_key_from_pem(pem_str).unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
        assert_eq!("parsed key is not an RSA public key", err.to_string());
        assert!(matches!(err, Error::TypeMismatch(algorithm) if algorithm == expected));
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let oid: ObjectIdentifier = "1.2.3.4".parse().unwrap();
        let spki = SubjectPublicKeyInfo::new(
            AlgorithmIdentifier::new(oid),
            BitString::new(0, small_key_der()),
        );
        let err = parse_rsa_public_key_from_pem(&spki_pem(&spki)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(KeyAlgorithm::Unknown)));
    }

    #[test]
    fn test_subject_public_key_json_shape() {
        let key = SubjectPublicKey::Rsa(RSAPublicKey {
            modulus: Integer::from(3233i64),
            public_exponent: Integer::from(17i64),
        });
        assert_eq!(
            serde_json::json!({
                "algorithm": "Rsa",
                "key": {"modulus": "3233", "public_exponent": "17"}
            }),
            serde_json::to_value(&key).unwrap()
        );
    }

    #[test]
    fn test_subject_public_key_keeps_other_algorithms() {
        let block = pemrsa_pem::unwrap(EC_P256_PUBLIC_KEY).unwrap();
        let key = SubjectPublicKey::from_der(block.payload()).unwrap();

        assert_eq!(KeyAlgorithm::Ec, key.key_algorithm());
        assert_eq!(EC_P256_PUBLIC_KEY.trim_end(), key.to_pem().unwrap().to_string());
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_armor("MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQC")]
    #[case::pkcs1_label(RSA_1024_PKCS1_PUBLIC_KEY)]
    #[case::private_key(RSA_1024_PRIVATE_KEY)]
    #[case::certificate("-----BEGIN CERTIFICATE-----\nMAA=\n-----END CERTIFICATE-----\n")]
    fn test_parse_rejects_format(#[case] text: &str) {
        let err = parse_rsa_public_key_from_pem(text).unwrap_err();
        assert_eq!(ErrorKind::Format, err.kind());
        assert_eq!("invalid public key format", err.to_string());
    }

    #[rstest]
    // BOOLEAN TRUE
    #[case::bare_boolean("-----BEGIN PUBLIC KEY-----\nAQH/\n-----END PUBLIC KEY-----\n")]
    // SEQUENCE { BOOLEAN FALSE }
    #[case::boolean_sequence("-----BEGIN PUBLIC KEY-----\nMAMBAQA=\n-----END PUBLIC KEY-----\n")]
    // base64("test data")
    #[case::text_body("-----BEGIN PUBLIC KEY-----\ndGVzdCBkYXRh\n-----END PUBLIC KEY-----\n")]
    fn test_parse_rejects_payload(#[case] text: &str) {
        let err = parse_rsa_public_key_from_pem(text).unwrap_err();
        assert_eq!(ErrorKind::Decode, err.kind());
        assert!(
            err.to_string().starts_with("failed to parse public key: "),
            "{err}"
        );
    }

    #[rstest]
    #[case::over_limit(pemrsa_der::MAX_DEPTH + 1)]
    #[case::hostile(5000)]
    fn test_parse_rejects_deep_nesting(#[case] depth: usize) {
        let text = crate::test_util::nested_sequences_pem(Label::PublicKey, depth);
        let Err(Error::Decode { source, .. }) = parse_rsa_public_key_from_pem(&text) else {
            panic!("expected a decode error");
        };
        assert_eq!(
            DecodeError::Der(pemrsa_der::error::Error::NestingTooDeep(pemrsa_der::MAX_DEPTH)),
            source
        );
    }

    #[rstest]
    #[case::absent_parameters(
        rsa_spki(None, BitString::new(0, small_key_der())),
        DecodeError::RsaParameters("absent")
    )]
    #[case::integer_parameters(
        rsa_spki(
            Some(AlgorithmParameters::Other(Element::Integer(Integer::from(0i64)))),
            BitString::new(0, small_key_der()),
        ),
        DecodeError::RsaParameters("INTEGER")
    )]
    #[case::unused_bits(
        rsa_spki(Some(AlgorithmParameters::Null), BitString::new(1, small_key_der())),
        DecodeError::UnusedBits(1)
    )]
    #[case::trailing_key_data(
        rsa_spki(
            Some(AlgorithmParameters::Null),
            BitString::new(0, [small_key_der(), vec![0x05, 0x00]].concat()),
        ),
        DecodeError::TrailingData(2)
    )]
    #[case::negative_modulus(
        rsa_spki(
            Some(AlgorithmParameters::Null),
            BitString::new(
                0,
                RSAPublicKey {
                    modulus: Integer::from(-3233i64),
                    public_exponent: Integer::from(17i64),
                }
                .to_der()
                .unwrap(),
            ),
        ),
        DecodeError::Pkcs1(crate::pkcs1::Error::NonPositive("modulus"))
    )]
    fn test_parse_rejects_rsa_key(#[case] spki: SubjectPublicKeyInfo, #[case] expected: DecodeError) {
        let Err(Error::Decode { source, .. }) = parse_rsa_public_key_from_pem(&spki_pem(&spki))
        else {
            panic!("expected a decode error");
        };
        assert_eq!(expected, source);
    }

    #[test]
    fn test_parse_from_many_threads() {
        let expected = parse_rsa_public_key_from_pem(RSA_2048_PUBLIC_KEY).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = [RSA_2048_PUBLIC_KEY, EC_P256_PUBLIC_KEY]
                .into_iter()
                .cycle()
                .take(8)
                .map(|pem| s.spawn(move || parse_rsa_public_key_from_pem(pem)))
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                let result = handle.join().unwrap();
                if i % 2 == 0 {
                    assert_eq!(expected, result.unwrap());
                } else {
                    assert_eq!(ErrorKind::TypeMismatch, result.unwrap_err().kind());
                }
            }
        });
    }
}
