//! Utility types for VPly.
//!
//! - [`ElementType`] / [`Element`] - scalar element types
//! - [`Error`] / [`Result`] - Error handling

mod element;
mod error;

pub use element::*;
pub use error::*;
