//! Error types for loading and writing PPM buffers.
//!
//! Two failure kinds cover the whole surface: [`Error::Io`] for file-level
//! failures and [`Error::Format`] for a malformed header. Header problems are
//! broken down further by [`FormatError`] so callers get the actual offending
//! values in the message.
//!
//! Bounds violations on accessors and cut operations are contract violations,
//! not runtime conditions — those panic instead of returning an error.

use thiserror::Error;

/// A load or write operation failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file could not be opened, read, or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The header is missing or malformed. No partial buffer is returned.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A malformed PPM header.
///
/// Raised only while parsing the header. A pixel stream that ends early is
/// deliberately *not* an error; see [`PixelBuffer::decode`](crate::PixelBuffer::decode).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// The input contained no magic-number token.
    #[error("missing magic number")]
    MissingMagic,

    /// The dimension tokens could not be parsed as integers, even after
    /// skipping one stray token.
    #[error("cannot parse image dimensions")]
    BadDimensions,

    /// A parsed dimension was zero.
    #[error("malformed image, dimension too small: {cols}x{rows}")]
    DimensionTooSmall {
        /// Parsed column count.
        cols: u32,
        /// Parsed row count.
        rows: u32,
    },

    /// The max channel value token was absent or unparseable.
    #[error("missing or malformed max channel value")]
    BadMaxValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_messages() {
        assert_eq!(
            FormatError::DimensionTooSmall { cols: 0, rows: 4 }.to_string(),
            "malformed image, dimension too small: 0x4"
        );
        assert_eq!(FormatError::MissingMagic.to_string(), "missing magic number");
    }

    #[test]
    fn io_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn format_error_converts() {
        let err = Error::from(FormatError::BadDimensions);
        assert_eq!(err.to_string(), "cannot parse image dimensions");
    }
}
