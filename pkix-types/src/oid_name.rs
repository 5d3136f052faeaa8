//! Trait for types that have OIDs with conventional names

/// Human-readable names for well-known OIDs.
///
/// For example, the algorithm `1.2.840.113549.1.1.1` is conventionally called `rsaEncryption`
/// and the curve `1.2.840.10045.3.1.7` is `secp256r1`.
pub trait OidName {
    /// Returns the conventional name for this type's OID, if it has one
    fn oid_name(&self) -> Option<&'static str>;
}
