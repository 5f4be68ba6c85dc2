use std::error::Error;
use std::fmt;

/// Custom error type for data preparation failures
#[derive(Debug, Clone, PartialEq)]
pub enum RadioPrepError {
    /// Two row-aligned arrays disagree on their length
    LengthMismatch { expected: usize, got: usize },
    /// Image planes must be square for the circular crop
    NotSquare { height: usize, width: usize },
    EmptyDataset,
    /// A fraction parameter fell outside [0, 1]
    InvalidFraction { name: &'static str, value: f32 },
    /// A size parameter (batch size, tiles per row) was zero; payload names it
    ZeroSize(&'static str),
    IndexOutOfBounds { index: usize, len: usize },
    /// More samples requested than the index set holds
    SubsetTooLarge { requested: usize, available: usize },
    /// Image conversion only handles 1- or 3-channel planes
    UnsupportedChannels(usize),
}

impl fmt::Display for RadioPrepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RadioPrepError::LengthMismatch { expected, got } => {
                write!(f, "Row-aligned arrays must have equal length: expected {}, got {}", expected, got)
            }
            RadioPrepError::NotSquare { height, width } => {
                write!(f, "Image planes must be square, got {}x{}", height, width)
            }
            RadioPrepError::EmptyDataset => write!(f, "Operation requires a non-empty dataset"),
            RadioPrepError::InvalidFraction { name, value } => {
                write!(f, "Fraction '{}' must lie in [0, 1], got {}", name, value)
            }
            RadioPrepError::ZeroSize(name) => write!(f, "'{}' must be at least 1", name),
            RadioPrepError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for dataset of length {}", index, len)
            }
            RadioPrepError::SubsetTooLarge { requested, available } => {
                write!(f, "Requested subset of {} samples but only {} are available", requested, available)
            }
            RadioPrepError::UnsupportedChannels(channels) => {
                write!(f, "Expected 1 or 3 image channels, got {}", channels)
            }
        }
    }
}

impl Error for RadioPrepError {}
