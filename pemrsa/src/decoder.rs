//! Decoding half of the conversion pipeline.
//!
//! A conversion from `T` to `D` needs two impls:
//!
//! ```no_run
//! use pemrsa::decoder::{DecodableFrom, Decoder};
//!
//! struct Armored(String);
//! struct Payload(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct PayloadError;
//!
//! impl DecodableFrom<Armored> for Payload {}
//!
//! impl Decoder<Armored, Payload> for Armored {
//!     type Error = PayloadError;
//!
//!     fn decode(&self) -> Result<Payload, Self::Error> {
//!         Ok(Payload(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```
//!
//! Because the destination type is a trait parameter, the caller picks it with a type
//! annotation: `let der: Der = bytes.decode()?;`.

/// Converts `self` (of type `T`) into `D`.
///
/// Implementations must be pure: decoding the same value twice yields equal results, and no
/// state is shared between calls.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// Error returned when `self` is not a valid encoding of `D`.
    type Error;

    /// Decodes `self` into `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker: `Self` can be produced from a `T` by a [`Decoder`].
pub trait DecodableFrom<T> {}
