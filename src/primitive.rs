//! Primitive codec - tagged geometric records.
//!
//! Every record starts with a 32-bit primitive tag, followed by the fixed
//! geometry fields of that primitive and, for all but the line strip, a
//! trailing attribute list.
//!
//! Primitive tags and attribute type IDs share the same integer range but
//! are separate namespaces: a reader always knows which one it expects next.

use std::fmt;
use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::attribute::{validate_attributes, write_attribute_list, Attribute};
use crate::attributed::{AttributedLineStrip, AttributedPoint};
use crate::util::Result;
use crate::value::{Float, Matrix4f, Value, Vector3f};

/// Tag written at the start of every primitive record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PrimitiveId {
    Point = 1,
    Line = 2,
    Sphere = 3,
    UniformGrid = 4,
    Box = 5,
    Aabb = 6,
    AttributedLineStrip = 7,
}

impl PrimitiveId {
    /// All tags in wire order.
    pub const ALL: [PrimitiveId; 7] = [
        Self::Point,
        Self::Line,
        Self::Sphere,
        Self::UniformGrid,
        Self::Box,
        Self::Aabb,
        Self::AttributedLineStrip,
    ];

    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub const fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Point),
            2 => Some(Self::Line),
            3 => Some(Self::Sphere),
            4 => Some(Self::UniformGrid),
            5 => Some(Self::Box),
            6 => Some(Self::Aabb),
            7 => Some(Self::AttributedLineStrip),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Line => "Line",
            Self::Sphere => "Sphere",
            Self::UniformGrid => "UniformGrid",
            Self::Box => "Box",
            Self::Aabb => "AABB",
            Self::AttributedLineStrip => "AttributedLineStrip",
        }
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Write a primitive tag.
#[inline]
pub fn write_primitive_id<W: Write + ?Sized>(w: &mut W, id: PrimitiveId) -> Result<()> {
    w.write_i32::<NativeEndian>(id.as_i32())?;
    Ok(())
}

pub fn write_point<W: Write + ?Sized>(
    w: &mut W,
    pos: impl Into<Vector3f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let pos: Vector3f = pos.into();
    write_primitive_id(w, PrimitiveId::Point)?;
    pos.write_to(w)?;
    write_attribute_list(w, attributes)
}

pub fn write_line<W: Write + ?Sized>(
    w: &mut W,
    p1: impl Into<Vector3f>,
    p2: impl Into<Vector3f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let p1: Vector3f = p1.into();
    let p2: Vector3f = p2.into();
    write_primitive_id(w, PrimitiveId::Line)?;
    p1.write_to(w)?;
    p2.write_to(w)?;
    write_attribute_list(w, attributes)
}

/// Sphere fields are written as center, radius, transform.
pub fn write_sphere<W: Write + ?Sized>(
    w: &mut W,
    center: impl Into<Vector3f>,
    radius: impl Into<Float>,
    transform: impl Into<Matrix4f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let center: Vector3f = center.into();
    let radius: Float = radius.into();
    let transform: Matrix4f = transform.into();
    write_primitive_id(w, PrimitiveId::Sphere)?;
    center.write_to(w)?;
    radius.write_to(w)?;
    transform.write_to(w)?;
    write_attribute_list(w, attributes)
}

pub fn write_uniform_grid<W: Write + ?Sized>(
    w: &mut W,
    transform: impl Into<Matrix4f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let transform: Matrix4f = transform.into();
    write_primitive_id(w, PrimitiveId::UniformGrid)?;
    transform.write_to(w)?;
    write_attribute_list(w, attributes)
}

pub fn write_box<W: Write + ?Sized>(
    w: &mut W,
    transform: impl Into<Matrix4f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let transform: Matrix4f = transform.into();
    write_primitive_id(w, PrimitiveId::Box)?;
    transform.write_to(w)?;
    write_attribute_list(w, attributes)
}

pub fn write_aabb<W: Write + ?Sized>(
    w: &mut W,
    corner1: impl Into<Vector3f>,
    corner2: impl Into<Vector3f>,
    attributes: &[Attribute],
) -> Result<()> {
    validate_attributes(attributes)?;
    let corner1: Vector3f = corner1.into();
    let corner2: Vector3f = corner2.into();
    write_primitive_id(w, PrimitiveId::Aabb)?;
    corner1.write_to(w)?;
    corner2.write_to(w)?;
    write_attribute_list(w, attributes)
}

/// Any record that can appear in a VPly stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Point {
        pos: Vector3f,
        attributes: Vec<Attribute>,
    },
    Line {
        p1: Vector3f,
        p2: Vector3f,
        attributes: Vec<Attribute>,
    },
    Sphere {
        center: Vector3f,
        radius: Float,
        transform: Matrix4f,
        attributes: Vec<Attribute>,
    },
    UniformGrid {
        transform: Matrix4f,
        attributes: Vec<Attribute>,
    },
    Box {
        transform: Matrix4f,
        attributes: Vec<Attribute>,
    },
    Aabb {
        corner1: Vector3f,
        corner2: Vector3f,
        attributes: Vec<Attribute>,
    },
    /// Point with a pre-encoded attribute list.
    AttributedPoint(AttributedPoint),
    AttributedLineStrip(AttributedLineStrip),
}

impl Primitive {
    pub fn point(pos: impl Into<Vector3f>, attributes: Vec<Attribute>) -> Self {
        Self::Point {
            pos: pos.into(),
            attributes,
        }
    }

    pub fn line(
        p1: impl Into<Vector3f>,
        p2: impl Into<Vector3f>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self::Line {
            p1: p1.into(),
            p2: p2.into(),
            attributes,
        }
    }

    pub fn sphere(
        center: impl Into<Vector3f>,
        radius: impl Into<Float>,
        transform: impl Into<Matrix4f>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self::Sphere {
            center: center.into(),
            radius: radius.into(),
            transform: transform.into(),
            attributes,
        }
    }

    pub fn uniform_grid(transform: impl Into<Matrix4f>, attributes: Vec<Attribute>) -> Self {
        Self::UniformGrid {
            transform: transform.into(),
            attributes,
        }
    }

    pub fn box_(transform: impl Into<Matrix4f>, attributes: Vec<Attribute>) -> Self {
        Self::Box {
            transform: transform.into(),
            attributes,
        }
    }

    pub fn aabb(
        corner1: impl Into<Vector3f>,
        corner2: impl Into<Vector3f>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self::Aabb {
            corner1: corner1.into(),
            corner2: corner2.into(),
            attributes,
        }
    }

    /// Tag this record is written with.
    pub fn id(&self) -> PrimitiveId {
        match self {
            Self::Point { .. } | Self::AttributedPoint(_) => PrimitiveId::Point,
            Self::Line { .. } => PrimitiveId::Line,
            Self::Sphere { .. } => PrimitiveId::Sphere,
            Self::UniformGrid { .. } => PrimitiveId::UniformGrid,
            Self::Box { .. } => PrimitiveId::Box,
            Self::Aabb { .. } => PrimitiveId::Aabb,
            Self::AttributedLineStrip(_) => PrimitiveId::AttributedLineStrip,
        }
    }

    /// Write the full record.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        match self {
            Self::Point { pos, attributes } => write_point(w, *pos, attributes),
            Self::Line { p1, p2, attributes } => write_line(w, *p1, *p2, attributes),
            Self::Sphere {
                center,
                radius,
                transform,
                attributes,
            } => write_sphere(w, *center, *radius, *transform, attributes),
            Self::UniformGrid {
                transform,
                attributes,
            } => write_uniform_grid(w, *transform, attributes),
            Self::Box {
                transform,
                attributes,
            } => write_box(w, *transform, attributes),
            Self::Aabb {
                corner1,
                corner2,
                attributes,
            } => write_aabb(w, *corner1, *corner2, attributes),
            Self::AttributedPoint(point) => point.write_to(w),
            Self::AttributedLineStrip(strip) => strip.write_to(w),
        }
    }
}

impl From<AttributedPoint> for Primitive {
    fn from(p: AttributedPoint) -> Self {
        Self::AttributedPoint(p)
    }
}

impl From<AttributedLineStrip> for Primitive {
    fn from(s: AttributedLineStrip) -> Self {
        Self::AttributedLineStrip(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ALL_TYPE_IDS;
    use crate::util::Error;
    use glam::{Mat4, Vec3};

    fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        i32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_point_with_weight() {
        let mut out = Vec::new();
        let attrs = [Attribute::new("weight", 0.5f32)];
        write_point(&mut out, Vec3::new(1.0, 2.0, 3.0), &attrs).unwrap();

        assert_eq!(i32_at(&out, 0), 1);
        assert_eq!(f32_at(&out, 4), 1.0);
        assert_eq!(f32_at(&out, 8), 2.0);
        assert_eq!(f32_at(&out, 12), 3.0);
        assert_eq!(i32_at(&out, 16), 6);
        assert_eq!(&out[20..26], b"weight");
        assert_eq!(i32_at(&out, 26), 33);
        assert_eq!(f32_at(&out, 30), 0.5);
        assert_eq!(i32_at(&out, 34), 0);
        assert_eq!(out.len(), 38);
    }

    #[test]
    fn test_fixed_sizes_without_attributes() {
        let t = Mat4::IDENTITY;
        let cases = [
            (Primitive::point(Vec3::ZERO, vec![]), 4 + 12 + 4),
            (Primitive::line(Vec3::ZERO, Vec3::ONE, vec![]), 4 + 24 + 4),
            (Primitive::sphere(Vec3::ZERO, 1.0f32, t, vec![]), 4 + 12 + 4 + 64 + 4),
            (Primitive::uniform_grid(t, vec![]), 4 + 64 + 4),
            (Primitive::box_(t, vec![]), 4 + 64 + 4),
            (Primitive::aabb(Vec3::ZERO, Vec3::ONE, vec![]), 4 + 24 + 4),
        ];
        for (prim, len) in cases {
            let mut out = Vec::new();
            prim.write_to(&mut out).unwrap();
            assert_eq!(out.len(), len, "{}", prim.id());
            assert_eq!(i32_at(&out, 0), prim.id().as_i32());
            assert_eq!(i32_at(&out, len - 4), 0);
        }
    }

    #[test]
    fn test_sphere_field_order() {
        let mut out = Vec::new();
        let t = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        write_sphere(&mut out, Vec3::new(1.0, 2.0, 3.0), 4.0f32, t, &[]).unwrap();
        assert_eq!(i32_at(&out, 0), 3);
        assert_eq!(f32_at(&out, 4), 1.0);
        assert_eq!(f32_at(&out, 16), 4.0);
        // Row-major transform starts at byte 20; translation x is row 0, col 3.
        assert_eq!(f32_at(&out, 20), 1.0);
        assert_eq!(f32_at(&out, 20 + 3 * 4), 7.0);
    }

    #[test]
    fn test_tags() {
        let ids: Vec<i32> = PrimitiveId::ALL.iter().map(|p| p.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        for id in PrimitiveId::ALL {
            assert_eq!(PrimitiveId::from_i32(id.as_i32()), Some(id));
        }
        assert_eq!(PrimitiveId::from_i32(0), None);
        assert_eq!(PrimitiveId::from_i32(8), None);
    }

    // Tags 5-7 coincide numerically with no type ID today, but tags 1-4 do;
    // the two namespaces are only kept apart by stream position.
    #[test]
    fn test_tag_and_type_id_overlap_is_known() {
        let overlap: Vec<i32> = PrimitiveId::ALL
            .iter()
            .map(|p| p.as_i32())
            .filter(|id| ALL_TYPE_IDS.contains(id))
            .collect();
        assert_eq!(overlap, vec![1, 2, 3, 4]);
    }

    /// Sink that accepts nothing.
    struct FullSink;

    impl Write for FullSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_propagates() {
        let err = write_point(&mut FullSink, Vec3::ZERO, &[]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
