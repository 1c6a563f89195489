//! Type-ID registry.
//!
//! Every attribute value carries an integer type ID so a viewer can decode it
//! without knowing the attribute in advance. The table is fixed for wire
//! compatibility:
//!
//! | Element   | Shape     | Type ID |
//! |-----------|-----------|---------|
//! | `int32_t` | vector 1-4 | 1-4    |
//! | `float32_t` | vector 1-4 | 33-36 |
//! | `float32_t` | matrix 3x3 | 257  |
//! | `float32_t` | matrix 4x4 | 258  |
//!
//! `0` is reserved for the attribute-list terminator and is never a type ID.

use std::fmt;

use crate::util::{ElementType, Error, Result};

/// Type ID value that ends every attribute list.
pub const TERMINATOR: i32 = 0;

/// Offset added to the arity of float vectors.
const FLOAT_VECTOR_BASE: i32 = 32;

/// Type ID of a 3x3 float matrix.
pub const MATRIX3F_TYPE_ID: i32 = 257;

/// Type ID of a 4x4 float matrix.
pub const MATRIX4F_TYPE_ID: i32 = 258;

/// Every type ID the registry can produce.
pub const ALL_TYPE_IDS: [i32; 10] = [1, 2, 3, 4, 33, 34, 35, 36, 257, 258];

/// Arity of a vector value or shape of a matrix value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed-arity tuple.
    Vector(usize),
    /// Row-major table.
    Matrix { rows: usize, cols: usize },
}

impl Shape {
    /// Number of scalar elements in a value of this shape.
    #[inline]
    pub const fn num_elements(self) -> usize {
        match self {
            Self::Vector(n) => n,
            Self::Matrix { rows, cols } => rows * cols,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector(n) => write!(f, "vec{}", n),
            Self::Matrix { rows, cols } => write!(f, "mat{}x{}", rows, cols),
        }
    }
}

/// Type ID of a vector, or `None` if the pair is unmapped.
pub const fn vector_type_id(element: ElementType, arity: usize) -> Option<i32> {
    if arity == 0 || arity > 4 {
        return None;
    }
    match element {
        ElementType::Int32 => Some(arity as i32),
        ElementType::Float32 => Some(FLOAT_VECTOR_BASE + arity as i32),
    }
}

/// Type ID of a matrix, or `None` if the shape is unmapped.
///
/// Only square 3x3 and 4x4 float matrices have IDs.
pub const fn matrix_type_id(element: ElementType, rows: usize, cols: usize) -> Option<i32> {
    match (element, rows, cols) {
        (ElementType::Float32, 3, 3) => Some(MATRIX3F_TYPE_ID),
        (ElementType::Float32, 4, 4) => Some(MATRIX4F_TYPE_ID),
        _ => None,
    }
}

/// Runtime lookup of the type ID for an (element type, shape) pair.
pub fn type_id(element: ElementType, shape: Shape) -> Result<i32> {
    let id = match shape {
        Shape::Vector(n) => vector_type_id(element, n),
        Shape::Matrix { rows, cols } => matrix_type_id(element, rows, cols),
    };
    id.ok_or(Error::UnsupportedType { element, shape })
}

/// Reverse lookup: element type and shape behind a type ID.
pub const fn describe(type_id: i32) -> Option<(ElementType, Shape)> {
    match type_id {
        1..=4 => Some((ElementType::Int32, Shape::Vector(type_id as usize))),
        33..=36 => Some((
            ElementType::Float32,
            Shape::Vector((type_id - FLOAT_VECTOR_BASE) as usize),
        )),
        MATRIX3F_TYPE_ID => Some((ElementType::Float32, Shape::Matrix { rows: 3, cols: 3 })),
        MATRIX4F_TYPE_ID => Some((ElementType::Float32, Shape::Matrix { rows: 4, cols: 4 })),
        _ => None,
    }
}

/// Byte length of the value payload that follows a type ID on the wire.
pub const fn payload_size(type_id: i32) -> Option<usize> {
    match describe(type_id) {
        Some((element, shape)) => Some(element.num_bytes() * shape.num_elements()),
        None => None,
    }
}
