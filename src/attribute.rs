//! Attribute codec - named typed values and attribute lists.
//!
//! Wire layout of one attribute (all integers 32-bit signed, native endian):
//!
//! ```text
//! key_len | key bytes (no terminator) | type_id | value payload
//! ```
//!
//! An attribute list is zero or more attributes followed by a single `0`.

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};
use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::types::TERMINATOR;
use crate::util::{Error, Result};
use crate::value::*;

/// Size of every integer field in the stream.
pub(crate) const FIELD_SIZE: usize = 4;

/// Any value that can be carried by an attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeValue {
    Int(Int),
    Vector2i(Vector2i),
    Vector3i(Vector3i),
    Vector4i(Vector4i),
    Float(Float),
    Vector2f(Vector2f),
    Vector3f(Vector3f),
    Vector4f(Vector4f),
    Matrix3f(Matrix3f),
    Matrix4f(Matrix4f),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AttributeValue::Int($v) => $body,
            AttributeValue::Vector2i($v) => $body,
            AttributeValue::Vector3i($v) => $body,
            AttributeValue::Vector4i($v) => $body,
            AttributeValue::Float($v) => $body,
            AttributeValue::Vector2f($v) => $body,
            AttributeValue::Vector3f($v) => $body,
            AttributeValue::Vector4f($v) => $body,
            AttributeValue::Matrix3f($v) => $body,
            AttributeValue::Matrix4f($v) => $body,
        }
    };
}

impl AttributeValue {
    /// Wire type ID of the wrapped value.
    pub fn type_id(&self) -> i32 {
        fn id_of<V: Value>(_: &V) -> i32 {
            V::TYPE_ID
        }
        dispatch!(self, v => id_of(v))
    }

    /// Payload size in bytes.
    pub fn byte_len(&self) -> usize {
        dispatch!(self, v => v.byte_len())
    }

    /// Write the raw payload bytes.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        dispatch!(self, v => v.write_to(w))
    }
}

macro_rules! attribute_value_from {
    ($($variant:ident: $($src:ty),+;)*) => {
        $($(
            impl From<$src> for AttributeValue {
                #[inline]
                fn from(v: $src) -> Self {
                    AttributeValue::$variant(v.into())
                }
            }
        )+)*
    };
}

attribute_value_from! {
    Int: Int, i32;
    Vector2i: Vector2i, IVec2, [i32; 2];
    Vector3i: Vector3i, IVec3, [i32; 3];
    Vector4i: Vector4i, IVec4, [i32; 4];
    Float: Float, f32;
    Vector2f: Vector2f, Vec2, [f32; 2];
    Vector3f: Vector3f, Vec3, [f32; 3];
    Vector4f: Vector4f, Vec4, [f32; 4];
    Matrix3f: Matrix3f, Mat3;
    Matrix4f: Matrix4f, Mat4;
}

/// A named typed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Type ID written after the key.
    #[inline]
    pub fn type_id(&self) -> i32 {
        self.value.type_id()
    }

    /// Total encoded size: key length, key, type ID, payload.
    pub fn encoded_len(&self) -> usize {
        FIELD_SIZE + self.key.len() + FIELD_SIZE + self.value.byte_len()
    }

    /// Key byte length as the 32-bit field written on the wire.
    ///
    /// Readers take a zero length as the end of the list, so empty keys are
    /// rejected.
    fn key_len(&self) -> Result<i32> {
        if self.key.is_empty() {
            return Err(Error::EmptyKey);
        }
        i32::try_from(self.key.len()).map_err(|_| Error::KeyTooLong(self.key.len()))
    }

    /// Write this attribute (without any list terminator).
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        let key_len = self.key_len()?;
        w.write_i32::<NativeEndian>(key_len)?;
        w.write_all(self.key.as_bytes())?;
        w.write_i32::<NativeEndian>(self.type_id())?;
        self.value.write_to(w)
    }
}

/// Check every key fits its length field, so a list is rejected before any
/// byte of it is written.
pub fn validate_attributes(attributes: &[Attribute]) -> Result<()> {
    for attr in attributes {
        attr.key_len()?;
    }
    Ok(())
}

/// Encoded size of an attribute list including its terminator.
pub fn attribute_list_len(attributes: &[Attribute]) -> usize {
    attributes.iter().map(Attribute::encoded_len).sum::<usize>() + FIELD_SIZE
}

/// Write the attribute-list terminator.
#[inline]
pub fn write_terminator<W: Write + ?Sized>(w: &mut W) -> Result<()> {
    w.write_i32::<NativeEndian>(TERMINATOR)?;
    Ok(())
}

/// Write attributes in the given order, then the terminator.
///
/// Order is preserved and duplicate keys are written as given.
pub fn write_attribute_list<W: Write + ?Sized>(w: &mut W, attributes: &[Attribute]) -> Result<()> {
    validate_attributes(attributes)?;
    for attr in attributes {
        attr.write_to(w)?;
    }
    write_terminator(w)
}

// ============================================================================
// Buffered attribute lists
// ============================================================================

/// Attribute list under construction.
///
/// Attributes are encoded as they are pushed; [`seal`](Self::seal) appends
/// the terminator and freezes the bytes.
#[derive(Clone, Debug, Default)]
pub struct AttributeBuffer {
    bytes: Vec<u8>,
}

impl AttributeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one attribute into the buffer.
    pub fn push(&mut self, attribute: &Attribute) -> Result<()> {
        attribute.key_len()?;
        self.bytes.reserve(attribute.encoded_len());
        attribute.write_to(&mut self.bytes)
    }

    /// Encode several attributes. Nothing is buffered if any key is invalid.
    pub fn extend(&mut self, attributes: &[Attribute]) -> Result<()> {
        validate_attributes(attributes)?;
        for attr in attributes {
            attr.write_to(&mut self.bytes)?;
        }
        Ok(())
    }

    /// Bytes buffered so far, without terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Terminate the list and freeze it.
    pub fn seal(mut self) -> SealedAttributes {
        self.bytes.extend_from_slice(&TERMINATOR.to_ne_bytes());
        SealedAttributes {
            bytes: self.bytes.into_boxed_slice(),
        }
    }
}

/// A complete, terminated, immutable attribute list.
///
/// Cloning copies the bytes; clones never share storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedAttributes {
    bytes: Box<[u8]>,
}

impl SealedAttributes {
    /// Encode a whole attribute list in one step.
    pub fn from_attributes(attributes: &[Attribute]) -> Result<Self> {
        let mut buffer = AttributeBuffer {
            bytes: Vec::with_capacity(attribute_list_len(attributes)),
        };
        buffer.extend(attributes)?;
        Ok(buffer.seal())
    }

    /// The empty list: just the terminator.
    pub fn empty() -> Self {
        AttributeBuffer::new().seal()
    }

    /// Encoded bytes including the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true: a sealed list holds at least its terminator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Splice the buffered bytes into `w` verbatim.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.bytes)?;
        Ok(())
    }
}

impl Default for SealedAttributes {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_terminator() {
        let mut out = Vec::new();
        write_attribute_list(&mut out, &[]).unwrap();
        assert_eq!(out, vec![0u8; 4]);
        assert_eq!(SealedAttributes::empty().as_bytes(), &[0u8; 4]);
        assert_eq!(attribute_list_len(&[]), 4);
    }

    #[test]
    fn test_single_attribute_layout() {
        let attr = Attribute::new("weight", 0.5f32);
        let mut out = Vec::new();
        attr.write_to(&mut out).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&6i32.to_ne_bytes());
        expected.extend_from_slice(b"weight");
        expected.extend_from_slice(&33i32.to_ne_bytes());
        expected.extend_from_slice(&0.5f32.to_ne_bytes());
        assert_eq!(out, expected);
        assert_eq!(out.len(), attr.encoded_len());
    }

    #[test]
    fn test_list_length_sums() {
        let attrs = vec![
            Attribute::new("color", Vec3::new(1.0, 0.0, 0.0)),
            Attribute::new("id", 42),
            Attribute::new("xf", Mat4::IDENTITY),
            Attribute::new("id", 43),
        ];
        let mut out = Vec::new();
        write_attribute_list(&mut out, &attrs).unwrap();

        let expected: usize = attrs
            .iter()
            .map(|a| 4 + a.key.len() + 4 + a.value.byte_len())
            .sum::<usize>()
            + 4;
        assert_eq!(out.len(), expected);
        assert_eq!(out.len(), attribute_list_len(&attrs));
        assert_eq!(&out[out.len() - 4..], &[0u8; 4]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let attrs = vec![Attribute::new("b", 1), Attribute::new("a", 2), Attribute::new("b", 3)];
        let mut out = Vec::new();
        write_attribute_list(&mut out, &attrs).unwrap();

        // Each entry: 4 + 1 + 4 + 4 = 13 bytes.
        assert_eq!(out[4], b'b');
        assert_eq!(&out[9..13], &1i32.to_ne_bytes());
        assert_eq!(out[13 + 4], b'a');
        assert_eq!(out[26 + 4], b'b');
        assert_eq!(&out[26 + 9..26 + 13], &3i32.to_ne_bytes());
    }

    #[test]
    fn test_value_type_ids() {
        assert_eq!(AttributeValue::from(1).type_id(), 1);
        assert_eq!(AttributeValue::from([1, 2]).type_id(), 2);
        assert_eq!(AttributeValue::from(IVec3::ONE).type_id(), 3);
        assert_eq!(AttributeValue::from(IVec4::ONE).type_id(), 4);
        assert_eq!(AttributeValue::from(1.0f32).type_id(), 33);
        assert_eq!(AttributeValue::from(Vec2::ONE).type_id(), 34);
        assert_eq!(AttributeValue::from([0.0f32; 3]).type_id(), 35);
        assert_eq!(AttributeValue::from(Vec4::ONE).type_id(), 36);
        assert_eq!(AttributeValue::from(Mat3::IDENTITY).type_id(), 257);
        assert_eq!(AttributeValue::from(Matrix4f::identity()).type_id(), 258);
    }

    #[test]
    fn test_invalid_key_leaves_sink_untouched() {
        let attrs = vec![Attribute::new("fine", 1), Attribute::new("", 2)];
        let mut out = Vec::new();
        let err = write_attribute_list(&mut out, &attrs).unwrap_err();
        assert!(matches!(err, Error::EmptyKey));
        assert!(out.is_empty());

        let mut buffer = AttributeBuffer::new();
        assert!(buffer.extend(&attrs).is_err());
        assert!(buffer.is_empty());
        assert!(buffer.push(&attrs[1]).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_matches_direct_encoding() {
        let attrs = vec![Attribute::new("radius", 2.0f32), Attribute::new("lod", 3)];

        let mut direct = Vec::new();
        write_attribute_list(&mut direct, &attrs).unwrap();

        let mut buffer = AttributeBuffer::new();
        for a in &attrs {
            buffer.push(a).unwrap();
        }
        assert_eq!(buffer.len(), direct.len() - 4);
        let sealed = buffer.seal();
        assert_eq!(sealed.as_bytes(), direct.as_slice());
        assert_eq!(SealedAttributes::from_attributes(&attrs).unwrap(), sealed);
    }
}
