//! Error types for the JPEG encoder.

use std::fmt;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for encoder operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid image dimensions (zero, or larger than a frame header can hold)
    InvalidDimensions {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Dimensions are not a multiple of the alignment a stage requires
    UnsupportedDimensions {
        /// Plane width
        width: usize,
        /// Plane height
        height: usize,
        /// Required alignment in samples
        alignment: usize,
    },
    /// The pixel source did not yield a buffer of the expected size
    UnreadablePixelData {
        /// Expected buffer size in bytes
        expected: usize,
        /// Actual buffer size in bytes
        actual: usize,
    },
    /// Invalid quality value (must be 1-100)
    InvalidQuality(u8),
    /// Unknown chroma sampling ratio
    InvalidSamplingRatio(String),
    /// A block was built from a slice that does not hold 64 values
    InvalidBlockSize {
        /// Length of the offending slice
        len: usize,
    },
    /// Padding alignment must be non-zero
    InvalidAlignment(usize),
    /// A run/level pair with a zero level appeared before the end of a block
    InvalidRunLevelSequence {
        /// Position of the offending pair
        index: usize,
    },
    /// Invalid Huffman table structure
    InvalidHuffmanTable,
    /// Internal encoder error
    InternalError(&'static str),
    /// I/O error
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::UnsupportedDimensions {
                width,
                height,
                alignment,
            } => {
                write!(
                    f,
                    "Unsupported dimensions: {}x{} is not a multiple of {}",
                    width, height, alignment
                )
            }
            Error::UnreadablePixelData { expected, actual } => {
                write!(
                    f,
                    "Unreadable pixel data: expected {} bytes, got {}",
                    expected, actual
                )
            }
            Error::InvalidQuality(q) => {
                write!(f, "Invalid quality value: {} (must be 1-100)", q)
            }
            Error::InvalidSamplingRatio(ratio) => {
                write!(f, "Invalid sampling ratio: {:?}", ratio)
            }
            Error::InvalidBlockSize { len } => {
                write!(f, "Invalid block size: {} values (must be 64)", len)
            }
            Error::InvalidAlignment(alignment) => {
                write!(f, "Invalid alignment: {}", alignment)
            }
            Error::InvalidRunLevelSequence { index } => {
                write!(f, "Invalid run/level sequence: zero level at pair {}", index)
            }
            Error::InvalidHuffmanTable => {
                write!(f, "Invalid Huffman table structure")
            }
            Error::InternalError(msg) => {
                write!(f, "Internal encoder error: {}", msg)
            }
            Error::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = [
            (
                Error::InvalidDimensions {
                    width: 0,
                    height: 100,
                },
                "Invalid image dimensions: 0x100",
            ),
            (
                Error::UnsupportedDimensions {
                    width: 18,
                    height: 16,
                    alignment: 16,
                },
                "Unsupported dimensions: 18x16 is not a multiple of 16",
            ),
            (
                Error::UnreadablePixelData {
                    expected: 1000,
                    actual: 500,
                },
                "Unreadable pixel data: expected 1000 bytes, got 500",
            ),
            (
                Error::InvalidQuality(0),
                "Invalid quality value: 0 (must be 1-100)",
            ),
            (
                Error::InvalidSamplingRatio("4:1:1".into()),
                "Invalid sampling ratio: \"4:1:1\"",
            ),
            (
                Error::InvalidBlockSize { len: 63 },
                "Invalid block size: 63 values (must be 64)",
            ),
            (Error::InvalidAlignment(0), "Invalid alignment: 0"),
            (
                Error::InvalidRunLevelSequence { index: 2 },
                "Invalid run/level sequence: zero level at pair 2",
            ),
            (
                Error::InvalidHuffmanTable,
                "Invalid Huffman table structure",
            ),
            (
                Error::InternalError("test error"),
                "Internal encoder error: test error",
            ),
            (Error::IoError("disk full".into()), "I/O error: disk full"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::IoError(_)));
        assert!(error.to_string().contains("sink closed"));
    }

    #[test]
    fn test_error_is_error_trait() {
        let error: &dyn std::error::Error = &Error::InvalidQuality(0);
        assert!(!error.to_string().is_empty());
    }
}
