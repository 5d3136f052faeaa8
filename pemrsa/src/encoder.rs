//! Encoding half of the conversion pipeline, the mirror of [`crate::decoder`].
//!
//! Encoders run from the typed key back toward bytes:
//! `RSAPrivateKey → Element → ASN1Object → Der → Vec<u8>`.

/// Converts `self` (of type `T`) into `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// Error returned when `self` cannot be represented as `E`.
    type Error;

    /// Encodes `self` into `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker: `Self` can be produced from a `T` by an [`Encoder`].
pub trait EncodableTo<T> {}
