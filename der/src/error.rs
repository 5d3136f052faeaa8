use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("indefinite length is not allowed in DER")]
    IndefiniteLength,
    #[error("length field of {0} octets is too large")]
    LengthTooLarge(u8),
    #[error("length is not minimally encoded")]
    NonMinimalLength,
    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
    #[error("constructed values nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("high tag number form is not supported")]
    HighTagNumber,
    #[error("tag number {0} cannot be encoded in a single octet")]
    TagNumberTooLarge(u8),
    #[error("parser error {0:?}")]
    Parser(ErrorKind),
}

impl ParseError<&[u8]> for Error {
    fn from_error_kind(_input: &[u8], kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof => Error::UnexpectedEof,
            kind => Error::Parser(kind),
        }
    }

    fn append(_input: &[u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}
