//! DER (X.690 Distinguished Encoding Rules) TLV layer.
//!
//! Decodes a byte string into a list of top-level [`Tlv`]s and encodes them back. Constructed
//! values are parsed recursively. Only the subset of BER that DER allows is accepted: definite
//! lengths, minimally encoded.

use nom::{IResult, Parser};
use pemrsa::decoder::{DecodableFrom, Decoder};
use pemrsa::encoder::{EncodableTo, Encoder};

pub mod error;

use error::Error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_CLASS_UNIVERSAL: u8 = 0x00;
const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

// Long-form lengths wider than this cannot be represented in a u64.
const MAX_LENGTH_OCTETS: u8 = 8;

/// Maximum number of nested constructed TLVs.
pub const MAX_DEPTH: usize = 64;

type ParseResult<'a, T> = IResult<&'a [u8], T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let mut input: &[u8] = self;
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input).map_err(flatten)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out)?;
        }
        Ok(out)
    }
}

fn flatten(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        // complete parsers never report Incomplete
        nom::Err::Incomplete(_) => Error::UnexpectedEof,
    }
}

/// Universal class tags understood by the ASN.1 layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(value: u8) -> Self {
        match value {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x30 => PrimitiveTag::Sequence,
            0x31 => PrimitiveTag::Set,
            _ => PrimitiveTag::Unimplemented(value),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(value: &PrimitiveTag) -> Self {
        match value {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::Sequence => 0x30,
            PrimitiveTag::Set => 0x31,
            PrimitiveTag::Unimplemented(raw) => *raw,
        }
    }
}

/// Identifier octet of a TLV.
///
/// `Primitive` covers every tag that is not context-specific and keeps the raw identifier
/// octet so that unknown tags (application, private, unsupported universal) survive a
/// decode/encode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, raw) => raw & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }

    fn octet(&self) -> Result<u8, Error> {
        match self {
            Tag::Primitive(_, raw) => Ok(*raw),
            Tag::ContextSpecific { slot, constructed } => {
                if *slot >= TAG_NUMBER_MASK {
                    return Err(Error::TagNumberTooLarge(*slot));
                }
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                Ok(TAG_CLASS_CONTEXT_SPECIFIC | constructed | slot)
            }
        }
    }
}

impl From<u8> for Tag {
    fn from(raw: u8) -> Self {
        match raw & TAG_CLASS_MASK {
            TAG_CLASS_CONTEXT_SPECIFIC => Tag::ContextSpecific {
                slot: raw & TAG_NUMBER_MASK,
                constructed: raw & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            },
            TAG_CLASS_UNIVERSAL => Tag::Primitive(PrimitiveTag::from(raw), raw),
            _ => Tag::Primitive(PrimitiveTag::Unimplemented(raw), raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: u64,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            length: data.len() as u64,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        let length = tlvs.iter().map(Tlv::encoded_len).sum::<u64>();
        Tlv {
            tag,
            length,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Nested TLVs of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    fn encoded_len(&self) -> u64 {
        1 + length_octets(self.length).len() as u64 + self.length
    }

    fn parse(input: &[u8]) -> ParseResult<'_, Tlv> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> ParseResult<'_, Tlv> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let size = usize::try_from(length)
            .map_err(|_| nom::Err::Failure(Error::LengthOverflow(length)))?;
        let (input, data) = take(input, size)?;

        if tag.is_constructed() {
            if depth >= MAX_DEPTH {
                return Err(nom::Err::Failure(Error::NestingTooDeep(MAX_DEPTH)));
            }
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, tlv) = Self::parse_nested(data, depth + 1)?;
                data = rest;
                tlvs.push(tlv);
            }
            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        out.push(self.tag.octet()?);
        out.extend(length_octets(self.length));
        match &self.value {
            Value::Data(data) => out.extend_from_slice(data),
            Value::Tlv(tlvs) => {
                for tlv in tlvs {
                    tlv.write(out)?;
                }
            }
        }
        Ok(())
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }
}

fn byte(input: &[u8]) -> ParseResult<'_, u8> {
    nom::number::complete::be_u8(input)
}

fn take(input: &[u8], count: usize) -> ParseResult<'_, &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (input, n) = byte(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        return Err(nom::Err::Failure(Error::HighTagNumber));
    }
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> ParseResult<'_, u64> {
    let (input, n) = byte(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((input, n as u64));
    }

    // long form: the low 7 bits count the length octets that follow
    let count = n & 0x7f;
    if count == 0 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if count > MAX_LENGTH_OCTETS {
        return Err(nom::Err::Failure(Error::LengthTooLarge(count)));
    }
    let (input, bs) = take(input, count as usize)?;
    if bs[0] == 0 {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    let length = bs.iter().fold(0u64, |n, &b| (n << 8) | b as u64);
    if length < 0x80 {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    Ok((input, length))
}

fn length_octets(length: u64) -> Vec<u8> {
    if length < 0x80 {
        return vec![length as u8];
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let mut out = Vec::with_capacity(1 + bytes.len() - skip);
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
    out
}
