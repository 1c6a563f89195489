//! # VPly
//!
//! Encoder for VPly, a self-describing binary stream of debug-visualization
//! geometry. A stream is a sequence of tagged primitives (points, lines,
//! spheres, grids, boxes, axis-aligned boxes, attributed line strips), each
//! followed by a list of named, typed attributes. Attribute type IDs are
//! written inline so a viewer can decode attributes it has never seen.
//!
//! All integers and values are written in native byte order. There is no
//! header, footer or version field.
//!
//! ## Modules
//!
//! - [`util`] - Element types and errors
//! - [`types`] - Type-ID registry
//! - [`value`] - Vectors and matrices and their byte layout
//! - [`attribute`] - Attributes, attribute lists, sealed attribute buffers
//! - [`primitive`] - Primitive tags and record writers
//! - [`attributed`] - Attributed points and line strips
//! - [`writer`] - [`VPlyWriter`](writer::VPlyWriter) over any byte sink
//!
//! ## Example
//!
//! ```no_run
//! use vply::prelude::*;
//! use glam::Vec3;
//!
//! let mut out = VPlyWriter::create("debug.vply")?;
//! out.write_point(Vec3::new(1.0, 2.0, 3.0), &[Attribute::new("weight", 0.5f32)])?;
//!
//! let mut strip = AttributedLineStrip::new(1, &[])?;
//! strip.add_point_with(Vec3::ZERO, &[])?;
//! strip.add_point_with(Vec3::ONE, &[Attribute::new("color", Vec3::X)])?;
//! out.write_line_strip(&strip)?;
//! out.finish()?;
//! # Ok::<(), vply::Error>(())
//! ```

pub mod util;
pub mod types;
pub mod value;
pub mod attribute;
pub mod primitive;
pub mod attributed;
pub mod writer;

// Re-export commonly used types
pub use util::{ElementType, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Element, ElementType, Error, Result};
    pub use crate::types::Shape;
    pub use crate::value::*;
    pub use crate::attribute::{Attribute, AttributeValue, AttributeBuffer, SealedAttributes};
    pub use crate::primitive::{Primitive, PrimitiveId};
    pub use crate::attributed::{AttributedLineStrip, AttributedPoint};
    pub use crate::writer::VPlyWriter;
}
