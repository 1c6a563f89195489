//! Attributed primitives - points and line strips with pre-encoded attributes.
//!
//! Attributes are encoded into an owned [`SealedAttributes`] buffer when the
//! primitive is built and spliced into the stream verbatim when it is
//! written. A line strip can therefore collect points one at a time and
//! still write its point count ahead of them, without re-encoding anything.

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::attribute::{Attribute, SealedAttributes, FIELD_SIZE};
use crate::primitive::{write_primitive_id, PrimitiveId};
use crate::util::{Error, Result};
use crate::value::{Value, Vector3f};

/// A point whose attribute list has already been encoded.
///
/// Cloning copies the encoded attribute bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributedPoint {
    pos: Vector3f,
    attributes: SealedAttributes,
}

impl AttributedPoint {
    /// Encode `attributes` and bind them to `pos`.
    pub fn new(pos: impl Into<Vector3f>, attributes: &[Attribute]) -> Result<Self> {
        Ok(Self {
            pos: pos.into(),
            attributes: SealedAttributes::from_attributes(attributes)?,
        })
    }

    /// Bind an already sealed attribute list to `pos`.
    pub fn from_sealed(pos: impl Into<Vector3f>, attributes: SealedAttributes) -> Self {
        Self {
            pos: pos.into(),
            attributes,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector3f {
        self.pos
    }

    #[inline]
    pub fn attributes(&self) -> &SealedAttributes {
        &self.attributes
    }

    /// Size of the full point record.
    pub fn encoded_len(&self) -> usize {
        FIELD_SIZE + self.pos.byte_len() + self.attributes.len()
    }

    /// Write tag, position and the sealed attribute bytes.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_primitive_id(w, PrimitiveId::Point)?;
        self.pos.write_to(w)?;
        self.attributes.write_to(w)
    }
}

/// An ordered strip of attributed points with its own attribute list.
///
/// `order` is the interpolation order: 1 for a polyline, 2 for quadratic
/// segments and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributedLineStrip {
    order: i32,
    points: Vec<AttributedPoint>,
    attributes: SealedAttributes,
}

impl AttributedLineStrip {
    /// Create an empty strip; strip-level attributes are encoded now.
    pub fn new(order: i32, attributes: &[Attribute]) -> Result<Self> {
        Ok(Self {
            order,
            points: Vec::new(),
            attributes: SealedAttributes::from_attributes(attributes)?,
        })
    }

    /// Append a point. Points are written in insertion order.
    pub fn add_point(&mut self, point: AttributedPoint) {
        self.points.push(point);
    }

    /// Build a point in place and append it.
    pub fn add_point_with(
        &mut self,
        pos: impl Into<Vector3f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let point = AttributedPoint::new(pos, attributes)?;
        self.points.push(point);
        Ok(())
    }

    #[inline]
    pub fn order(&self) -> i32 {
        self.order
    }

    #[inline]
    pub fn points(&self) -> &[AttributedPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Strip-level attributes.
    #[inline]
    pub fn attributes(&self) -> &SealedAttributes {
        &self.attributes
    }

    /// Size of the full strip record.
    pub fn encoded_len(&self) -> usize {
        3 * FIELD_SIZE
            + self.points.iter().map(AttributedPoint::encoded_len).sum::<usize>()
            + self.attributes.len()
    }

    /// Write tag, order, point count, every point, then the strip attributes.
    ///
    /// The strip is not consumed. Writing it again produces the same bytes,
    /// and points added in between show up in the next write.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        let count = i32::try_from(self.points.len())
            .map_err(|_| Error::TooManyPoints(self.points.len()))?;

        write_primitive_id(w, PrimitiveId::AttributedLineStrip)?;
        w.write_i32::<NativeEndian>(self.order)?;
        w.write_i32::<NativeEndian>(count)?;
        for point in &self.points {
            point.write_to(w)?;
        }
        self.attributes.write_to(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::write_point;
    use glam::Vec3;

    fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        i32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn encode_point(p: &AttributedPoint) -> Vec<u8> {
        let mut out = Vec::new();
        p.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_point_matches_plain_point() {
        let attrs = [Attribute::new("weight", 0.5f32), Attribute::new("id", 9)];
        let pos = Vec3::new(1.0, 2.0, 3.0);

        let mut plain = Vec::new();
        write_point(&mut plain, pos, &attrs).unwrap();

        let point = AttributedPoint::new(pos, &attrs).unwrap();
        let bytes = encode_point(&point);
        assert_eq!(bytes, plain);
        assert_eq!(bytes.len(), point.encoded_len());
    }

    #[test]
    fn test_clone_is_independent() {
        let attrs = vec![Attribute::new("color", Vec3::new(1.0, 0.5, 0.25))];
        let source = AttributedPoint::new(Vec3::X, &attrs).unwrap();
        let expected = encode_point(&source);

        let copy = source.clone();
        drop(source);
        drop(attrs);
        assert_eq!(encode_point(&copy), expected);
    }

    #[test]
    fn test_strip_of_two_bare_points() {
        let mut strip = AttributedLineStrip::new(1, &[]).unwrap();
        strip.add_point(AttributedPoint::new(Vec3::new(0.0, 0.0, 0.0), &[]).unwrap());
        strip.add_point_with(Vec3::new(1.0, 1.0, 1.0), &[]).unwrap();

        let mut out = Vec::new();
        strip.write_to(&mut out).unwrap();

        assert_eq!(i32_at(&out, 0), 7);
        assert_eq!(i32_at(&out, 4), 1);
        assert_eq!(i32_at(&out, 8), 2);
        // Each point: tag, 12 position bytes, terminator.
        for i in 0..2 {
            let base = 12 + i * 20;
            assert_eq!(i32_at(&out, base), 1);
            assert_eq!(i32_at(&out, base + 16), 0);
        }
        assert_eq!(i32_at(&out, 52), 0);
        assert_eq!(out.len(), 56);
        assert_eq!(out.len(), strip.encoded_len());
    }

    #[test]
    fn test_strip_point_order_and_attributes() {
        let mut strip = AttributedLineStrip::new(2, &[Attribute::new("width", 3.0f32)]).unwrap();
        for i in 0..3 {
            strip
                .add_point_with(Vec3::splat(i as f32), &[Attribute::new("i", i)])
                .unwrap();
        }
        assert_eq!(strip.len(), 3);
        assert_eq!(strip.order(), 2);

        let mut out = Vec::new();
        strip.write_to(&mut out).unwrap();

        let mut offset = 12;
        for (i, point) in strip.points().iter().enumerate() {
            let expected = encode_point(point);
            assert_eq!(&out[offset..offset + expected.len()], expected.as_slice());
            assert_eq!(point.position().as_slice()[0], i as f32);
            offset += expected.len();
        }
        assert_eq!(&out[offset..], strip.attributes().as_bytes());
        assert_eq!(i32_at(&out, out.len() - 4), 0);
    }

    #[test]
    fn test_strip_reemission_is_deterministic() {
        let mut strip = AttributedLineStrip::new(1, &[Attribute::new("id", 4)]).unwrap();
        strip.add_point_with(Vec3::ZERO, &[]).unwrap();

        let mut first = Vec::new();
        strip.write_to(&mut first).unwrap();
        let mut second = Vec::new();
        strip.write_to(&mut second).unwrap();
        assert_eq!(first, second);

        strip.add_point_with(Vec3::ONE, &[]).unwrap();
        let mut third = Vec::new();
        strip.write_to(&mut third).unwrap();
        assert_eq!(i32_at(&third, 8), 2);
        assert_eq!(third.len(), first.len() + 20);
        assert_eq!(&third[..8], &first[..8]);
    }

    #[test]
    fn test_point_added_by_copy_is_unaffected() {
        let mut strip = AttributedLineStrip::new(1, &[]).unwrap();
        let point = AttributedPoint::new(Vec3::ONE, &[Attribute::new("k", 1)]).unwrap();
        strip.add_point(point.clone());
        let before = encode_point(&strip.points()[0]);
        drop(point);
        assert_eq!(encode_point(&strip.points()[0]), before);
    }
}
