//! Error types for the VPly encoder.

use thiserror::Error;

use super::ElementType;
use crate::types::Shape;

/// Main error type for VPly encoding.
#[derive(Error, Debug)]
pub enum Error {
    /// No type ID exists for this (element type, shape) pair
    #[error("Unsupported value type: {element} {shape}")]
    UnsupportedType { element: ElementType, shape: Shape },

    /// Empty attribute key (its zero length would read as the list terminator)
    #[error("Attribute key is empty")]
    EmptyKey,

    /// Attribute key does not fit the 32-bit signed length field
    #[error("Attribute key too long: {0} bytes")]
    KeyTooLong(usize),

    /// Line strip holds more points than the 32-bit signed count field allows
    #[error("Too many points in line strip: {0}")]
    TooManyPoints(usize),

    /// I/O error from the sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for VPly operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::UnsupportedType {
            element: ElementType::Int32,
            shape: Shape::Vector(5),
        };
        assert!(e.to_string().contains("int32_t"));
        assert!(e.to_string().contains("5"));

        let e = Error::KeyTooLong(3_000_000_000);
        assert!(e.to_string().contains("3000000000"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
