use thiserror::Error;

use super::Version;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected SEQUENCE for {field}, got {actual}")]
    ExpectedSequence {
        field: &'static str,
        actual: &'static str,
    },

    #[error("expected {expected} elements in {field}, got {actual}")]
    InvalidElementCount {
        field: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}, got {actual}")]
    ExpectedInteger {
        field: &'static str,
        actual: &'static str,
    },

    #[error("{0} must be a positive integer")]
    NonPositive(&'static str),

    #[error("invalid version: {0} (must be 0 for two-prime or 1 for multi-prime)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("version {version:?} is inconsistent with {other_primes} additional primes")]
    VersionMismatch {
        version: Version,
        other_primes: usize,
    },

    #[error("otherPrimeInfos must not be empty")]
    EmptyOtherPrimeInfos,

    #[error("unexpected key format: found {found}, expected PKCS#1 RSAPrivateKey")]
    UnexpectedKeyFormat { found: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
