//! Error types for PKIX types

use thiserror::Error;

/// Result type for PKIX types operations
pub type Result<T> = std::result::Result<T, Error>;

/// PKIX types error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // AlgorithmIdentifier errors
    #[error("AlgorithmIdentifier: expected SEQUENCE, got {0}")]
    AlgorithmIdentifierExpectedSequence(&'static str),
    #[error("AlgorithmIdentifier: empty SEQUENCE")]
    AlgorithmIdentifierEmpty,
    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER for algorithm, got {0}")]
    AlgorithmIdentifierExpectedOid(&'static str),
    #[error("AlgorithmIdentifier: expected 1 or 2 elements, got {0}")]
    AlgorithmIdentifierInvalidElementCount(usize),

    // SubjectPublicKeyInfo errors
    #[error("SubjectPublicKeyInfo: expected SEQUENCE, got {0}")]
    SubjectPublicKeyInfoExpectedSequence(&'static str),
    #[error("SubjectPublicKeyInfo: expected BIT STRING for subject public key, got {0}")]
    SubjectPublicKeyInfoExpectedBitString(&'static str),
    #[error("SubjectPublicKeyInfo: expected 2 elements, got {0}")]
    SubjectPublicKeyInfoInvalidElementCount(usize),

    /// ASN.1 encoding/decoding error
    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] pemrsa_asn1::error::Error),
}
