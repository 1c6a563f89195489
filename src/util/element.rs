//! Element types - the scalar storage types a VPly value can be built from.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Scalar element type of a vector or matrix value.
///
/// VPly only knows two element types. Both are 4 bytes wide and are written
/// in the platform's native byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    /// Signed 32-bit integer
    Int32,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32,
}

impl ElementType {
    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int32 => 4,
            Self::Float32 => 4,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32_t",
            Self::Float32 => "float32_t",
        }
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int32)
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trait for Rust types usable as VPly elements.
///
/// Implemented for `i32` and `f32` only, so any other element type is
/// rejected by the compiler.
pub trait Element: Pod + Zeroable + Copy + Default + PartialEq + fmt::Debug {
    /// The corresponding [`ElementType`] value.
    const ELEMENT: ElementType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Multiplicative identity, used for identity matrices.
    const ONE: Self;
}

impl Element for i32 {
    const ELEMENT: ElementType = ElementType::Int32;
    const ONE: Self = 1;
}

impl Element for f32 {
    const ELEMENT: ElementType = ElementType::Float32;
    const ONE: Self = 1.0;
}
