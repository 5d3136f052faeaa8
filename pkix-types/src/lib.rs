//! PKIX (Public Key Infrastructure using X.509) Common Types
//!
//! The subset of RFC 5280 types that public key containers need: the algorithm identifier and
//! the SubjectPublicKeyInfo wrapper used by `PUBLIC KEY` PEM blocks.

pub mod algorithm;
pub mod error;
pub mod oid_name;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters, KeyAlgorithm};
pub use error::{Error, Result};
pub use oid_name::OidName;
pub use subject_public_key_info::SubjectPublicKeyInfo;
