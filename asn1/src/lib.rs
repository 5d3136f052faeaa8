use std::{fmt::Display, str::FromStr};

use error::Error;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive};
use pemrsa::decoder::{DecodableFrom, Decoder};
use pemrsa::encoder::{EncodableTo, Encoder};
use pemrsa_der::{Der, PrimitiveTag, Tag, Tlv};
use serde::{Serialize, Serializer};

pub mod error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self
            .elements
            .iter()
            .map(Tlv::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

impl Element {
    /// Short ASN.1 type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::ContextSpecific { .. } => "context-specific",
            Element::Unimplemented(_) => "unsupported type",
        }
    }
}

fn children(tlv: &Tlv) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .unwrap_or_default()
        .iter()
        .map(Element::try_from)
        .collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => {
                let data = tlv.data().unwrap_or_default();
                match primitive_tag {
                    PrimitiveTag::Boolean => match data {
                        [0x00] => Ok(Element::Boolean(false)),
                        [0xff] => Ok(Element::Boolean(true)),
                        _ => Err(Error::InvalidBoolean),
                    },
                    PrimitiveTag::Integer => Integer::try_from(data).map(Element::Integer),
                    PrimitiveTag::BitString => BitString::try_from(data).map(Element::BitString),
                    PrimitiveTag::OctetString => Ok(Element::OctetString(OctetString::from(data))),
                    PrimitiveTag::Null => {
                        if data.is_empty() {
                            Ok(Element::Null)
                        } else {
                            Err(Error::NullNotEmpty)
                        }
                    }
                    PrimitiveTag::ObjectIdentifier => {
                        ObjectIdentifier::try_from(data).map(Element::ObjectIdentifier)
                    }
                    PrimitiveTag::Sequence => Ok(Element::Sequence(children(tlv)?)),
                    PrimitiveTag::Set => Ok(Element::Set(children(tlv)?)),
                    PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
                }
            }
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    // EXPLICIT tagging wraps exactly one element
                    let mut elements = children(tlv)?;
                    if elements.len() != 1 {
                        return Err(Error::InvalidContextSpecific {
                            slot: *slot,
                            msg: "constructed value must hold exactly one element",
                        });
                    }
                    let element = elements.remove(0);
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                        element: Box::new(element),
                    })
                } else {
                    // IMPLICIT tagging: the schema decides how to read the raw octets
                    let data = tlv.data().unwrap_or_default();
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(data))),
                    })
                }
            }
        }
    }
}

fn universal(tag: PrimitiveTag) -> Tag {
    let raw = u8::from(&tag);
    Tag::Primitive(tag, raw)
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        match element {
            Element::Boolean(b) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::Boolean),
                vec![if *b { 0xff } else { 0x00 }],
            )),
            Element::Integer(i) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::Integer),
                i.as_bigint().to_signed_bytes_be(),
            )),
            Element::BitString(bs) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::BitString),
                Vec::from(bs.clone()),
            )),
            Element::OctetString(os) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::OctetString),
                os.as_bytes().to_vec(),
            )),
            Element::Null => Ok(Tlv::new_primitive(universal(PrimitiveTag::Null), vec![])),
            Element::ObjectIdentifier(oid) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::ObjectIdentifier),
                Vec::try_from(oid)?,
            )),
            Element::Sequence(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Tlv::new_constructed(universal(PrimitiveTag::Sequence), tlvs))
            }
            Element::Set(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Tlv::new_constructed(universal(PrimitiveTag::Set), tlvs))
            }
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };
                if *constructed {
                    let inner = Tlv::try_from(element.as_ref())?;
                    return Ok(Tlv::new_constructed(tag, vec![inner]));
                }
                let inner = Tlv::try_from(element.as_ref())?;
                match inner.data() {
                    Some(data) => Ok(Tlv::new_primitive(tag, data.to_vec())),
                    None => Err(Error::ElementCannotEncode(
                        "IMPLICIT tagging of a constructed element",
                    )),
                }
            }
            Element::Unimplemented(tlv) => Ok(tlv.clone()),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Tlv::try_from(self)
    }
}

/// Arbitrary precision ASN.1 INTEGER.
///
/// Decoding enforces the DER rule that the content is the shortest two's complement
/// representation of the value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Number of bits in the magnitude (the RSA "key size" for a modulus).
    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }

    pub fn is_positive(&self) -> bool {
        self.inner.is_positive()
    }

    /// Big-endian magnitude without sign padding.
    pub fn to_unsigned_bytes_be(&self) -> Vec<u8> {
        self.inner.magnitude().to_bytes_be()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::IntegerNoData),
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 != 0 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Integer {
    /// Builds a non-negative integer from big-endian magnitude bytes.
    pub fn from_unsigned_bytes_be(bytes: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_bytes_be(Sign::Plus, bytes),
        }
    }
}

impl TryFrom<&Integer> for i64 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self, Self::Error> {
        value.inner.to_i64().ok_or(Error::IntegerOutOfRangeI64)
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for &b in value {
            if !pending && b == 0x80 {
                // leading 0x80 pads a sub-identifier, forbidden in DER
                return Err(Error::ObjectIdentifierIncompleteEncoding);
            }
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            pending = b & 0x80 != 0;
            if !pending {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first sub-identifier packs the first two arcs as 40 * X + Y.
        let first = subidentifiers[0];
        let (x, y) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        inner.push(x);
        inner.push(y);
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        let [x, y, rest @ ..] = oid.inner.as_slice() else {
            return Err(Error::ObjectIdentifierTooFewComponents);
        };
        if *x > 2 || (*x < 2 && *y >= 40) {
            return Err(Error::ObjectIdentifierInvalidArcs(*x, *y));
        }
        let first = x
            .checked_mul(40)
            .and_then(|v| v.checked_add(*y))
            .ok_or(Error::ObjectIdentifierOverflow)?;

        let mut result = Vec::new();
        for value in std::iter::once(&first).chain(rest) {
            push_base128(&mut result, *value);
        }
        Ok(result)
    }
}

fn push_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut encoded = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        encoded.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(encoded.iter().rev());
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BitString", 2)?;
        state.serialize_field("bit_length", &self.bit_len())?;
        let hex_string = self
            .data
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":");
        state.serialize_field("bits", &hex_string)?;
        state.end()
    }
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Number of unused bits in the last octet.
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused as usize
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let Some((&unused, data)) = value.split_first() else {
            return Err(Error::BitStringNoData);
        };
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString {
            unused,
            data: data.to_vec(),
        })
    }
}

impl From<BitString> for Vec<u8> {
    fn from(value: BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend(value.data);
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(inner: Vec<u8>) -> Self {
        OctetString { inner }
    }
}

/// Parses DER content nested inside a string type (the BIT STRING of a
/// SubjectPublicKeyInfo, for instance).
impl TryFrom<&BitString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &BitString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}
