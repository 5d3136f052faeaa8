//! Error types for ASN.1 parsing and encoding.

use thiserror::Error;

/// Errors that can occur while turning DER TLVs into ASN.1 elements and back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Boolean errors
    #[error("BOOLEAN: content must be a single 0x00 or 0xFF octet")]
    InvalidBoolean,

    // Null errors
    #[error("NULL: content must be empty")]
    NullNotEmpty,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: not minimally encoded")]
    IntegerNotMinimal,
    #[error("INTEGER: value out of range for i64")]
    IntegerOutOfRangeI64,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: sub-identifier overflows u64")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid first arcs {0}.{1}")]
    ObjectIdentifierInvalidArcs(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range")]
    BitStringUnusedBitsOutOfRange(u8),

    // Context-specific errors
    #[error("invalid context-specific value: {slot}, {msg}")]
    InvalidContextSpecific { slot: u8, msg: &'static str },

    // DER errors
    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[source] pemrsa_der::error::Error),

    // Element errors
    #[error("element: cannot encode {0}")]
    ElementCannotEncode(&'static str),
}
