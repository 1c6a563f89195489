//! Value codec - fixed-arity vectors and fixed-shape matrices.
//!
//! Values are written as raw element bytes in native byte order, tightly
//! packed, with no length prefix. A reader recovers the byte count from the
//! type ID alone (see [`crate::types::payload_size`]).
//!
//! The type ID of a value is an associated const. Asking for the ID of a
//! shape the registry does not map (e.g. `Vector<f32, 5>` or an integer
//! matrix) fails const evaluation, so such values cannot be built.

use std::io::Write;

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::types::{matrix_type_id, vector_type_id, Shape};
use crate::util::{Element, ElementType, Result};

/// A typed value with a fixed wire layout.
pub trait Value {
    /// Wire type ID of this value type. Never `0`.
    const TYPE_ID: i32;

    /// Element type of every cell.
    const ELEMENT: ElementType;

    /// Arity or matrix shape.
    const SHAPE: Shape;

    /// Encoded payload size in bytes.
    #[inline]
    fn byte_len(&self) -> usize {
        Self::ELEMENT.num_bytes() * Self::SHAPE.num_elements()
    }

    /// Write the raw payload bytes.
    fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()>;
}

// ============================================================================
// Vectors
// ============================================================================

/// Fixed-arity tuple of `N` elements of type `T`.
///
/// Only arities with a type ID can be built:
///
/// ```
/// use vply::value::{Value, Vector};
///
/// assert_eq!(<Vector<f32, 4> as Value>::TYPE_ID, 36);
/// let v = Vector::<i32, 2>::new([1, 2]);
/// assert_eq!(v.as_slice(), &[1, 2]);
/// ```
///
/// ```compile_fail
/// use vply::value::Vector;
///
/// // No type ID for a 5-element vector.
/// let _ = Vector::<f32, 5>::new([0.0; 5]);
/// ```
///
/// The elements are private, so a struct literal cannot bypass the check:
///
/// ```compile_fail
/// use vply::value::Vector;
///
/// let _ = Vector::<f32, 5> { data: [0.0; 5] };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T: Element, const N: usize> {
    data: [T; N],
}

pub type Int = Vector<i32, 1>;
pub type Vector2i = Vector<i32, 2>;
pub type Vector3i = Vector<i32, 3>;
pub type Vector4i = Vector<i32, 4>;

pub type Float = Vector<f32, 1>;
pub type Vector2f = Vector<f32, 2>;
pub type Vector3f = Vector<f32, 3>;
pub type Vector4f = Vector<f32, 4>;

impl<T: Element, const N: usize> Vector<T, N> {
    /// Create a vector from its elements.
    #[inline]
    pub fn new(data: [T; N]) -> Self {
        let _ = <Self as Value>::TYPE_ID;
        Self { data }
    }

    /// Elements in order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn to_array(&self) -> [T; N] {
        self.data
    }
}

impl<T: Element, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::new([T::default(); N])
    }
}

impl<T: Element, const N: usize> Value for Vector<T, N> {
    const TYPE_ID: i32 = match vector_type_id(T::ELEMENT, N) {
        Some(id) => id,
        None => panic!("no VPly type ID for this vector arity"),
    };
    const ELEMENT: ElementType = T::ELEMENT;
    const SHAPE: Shape = Shape::Vector(N);

    fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        let _ = Self::TYPE_ID;
        w.write_all(bytemuck::cast_slice(&self.data))?;
        Ok(())
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self::new(data)
    }
}

impl From<i32> for Int {
    #[inline]
    fn from(v: i32) -> Self {
        Self::new([v])
    }
}

impl From<f32> for Float {
    #[inline]
    fn from(v: f32) -> Self {
        Self::new([v])
    }
}

macro_rules! glam_vector_conversions {
    ($($glam:ty => $vply:ty),* $(,)?) => {
        $(
            impl From<$glam> for $vply {
                #[inline]
                fn from(v: $glam) -> Self {
                    Self::new(v.to_array())
                }
            }

            impl From<$vply> for $glam {
                #[inline]
                fn from(v: $vply) -> Self {
                    <$glam>::from_array(v.data)
                }
            }
        )*
    };
}

glam_vector_conversions! {
    Vec2 => Vector2f,
    Vec3 => Vector3f,
    Vec4 => Vector4f,
    IVec2 => Vector2i,
    IVec3 => Vector3i,
    IVec4 => Vector4i,
}

// ============================================================================
// Matrices
// ============================================================================

/// Row-major `R` x `C` table of elements of type `T`.
///
/// Only square 3x3 and 4x4 float matrices have type IDs:
///
/// ```
/// use vply::value::{Matrix3f, Value};
///
/// assert_eq!(Matrix3f::TYPE_ID, 257);
/// assert_eq!(Matrix3f::identity().get(1, 1), 1.0);
/// ```
///
/// ```compile_fail
/// use vply::value::Matrix;
///
/// // Integer matrices are not mapped.
/// let _ = Matrix::<i32, 3, 3>::zeros();
/// ```
///
/// ```compile_fail
/// use vply::value::Matrix;
///
/// // Neither are non-square ones.
/// let _ = Matrix::<f32, 3, 4>::identity();
/// ```
///
/// ```compile_fail
/// use vply::value::Matrix;
///
/// let _ = Matrix::<i32, 2, 3> { rows: [[1; 3]; 2] };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<T: Element, const R: usize, const C: usize> {
    rows: [[T; C]; R],
}

pub type Matrix3f = Matrix<f32, 3, 3>;
pub type Matrix4f = Matrix<f32, 4, 4>;

impl<T: Element, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Create a matrix from its rows.
    #[inline]
    pub fn new(rows: [[T; C]; R]) -> Self {
        let _ = <Self as Value>::TYPE_ID;
        Self { rows }
    }

    /// All-zero matrix.
    pub fn zeros() -> Self {
        Self::new([[T::default(); C]; R])
    }

    /// Identity matrix (ones on the main diagonal).
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..R.min(C) {
            m.rows[i][i] = T::ONE;
        }
        m
    }

    /// Build a matrix from row-major values.
    ///
    /// Extra values are ignored. If fewer than `R * C` values are given, the
    /// remaining cells repeat the last supplied value, so `[a, b]` for a 3x3
    /// matrix gives `[a, b, b, b, b, b, b, b, b]`. An empty slice yields zeros.
    pub fn from_values(values: &[T]) -> Self {
        let mut m = Self::zeros();
        if let Some(&last) = values.last() {
            let cells = m.rows.iter_mut().flat_map(|row| row.iter_mut());
            for (i, cell) in cells.enumerate() {
                *cell = values.get(i).copied().unwrap_or(last);
            }
        }
        m
    }

    /// Cell at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.rows[row][col]
    }

    /// Rows in order.
    #[inline]
    pub fn as_rows(&self) -> &[[T; C]; R] {
        &self.rows
    }

    /// Cells in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.rows.iter().flatten().copied().collect()
    }
}

impl<T: Element, const R: usize, const C: usize> Default for Matrix<T, R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Element, const R: usize, const C: usize> Value for Matrix<T, R, C> {
    const TYPE_ID: i32 = match matrix_type_id(T::ELEMENT, R, C) {
        Some(id) => id,
        None => panic!("no VPly type ID for this matrix shape"),
    };
    const ELEMENT: ElementType = T::ELEMENT;
    const SHAPE: Shape = Shape::Matrix { rows: R, cols: C };

    fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        let _ = Self::TYPE_ID;
        for row in &self.rows {
            w.write_all(bytemuck::cast_slice(row))?;
        }
        Ok(())
    }
}

// glam stores matrices column-major; transposing turns columns into rows.
impl From<Mat3> for Matrix3f {
    fn from(m: Mat3) -> Self {
        Self::new(m.transpose().to_cols_array_2d())
    }
}

impl From<Mat4> for Matrix4f {
    fn from(m: Mat4) -> Self {
        Self::new(m.transpose().to_cols_array_2d())
    }
}

impl From<Matrix3f> for Mat3 {
    fn from(m: Matrix3f) -> Self {
        Mat3::from_cols_array_2d(&m.rows).transpose()
    }
}

impl From<Matrix4f> for Mat4 {
    fn from(m: Matrix4f) -> Self {
        Mat4::from_cols_array_2d(&m.rows).transpose()
    }
}
