//! Error types for the field-to-mesh pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur anywhere between loading a field and writing tiles
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding or resizing an image failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration file is not valid TOML for this schema
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A field with zero rows or columns
    #[error("field is empty ({rows}x{cols})")]
    EmptyField { rows: usize, cols: usize },

    /// Auxiliary channel or buffer does not match the primary shape
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// NaN or infinity in a field cell
    #[error("non-finite value at row {row}, col {col}")]
    NonFiniteValue { row: usize, col: usize },

    /// Field has no variance and the flat-field policy rejects it
    #[error("field is flat (zero variance); cannot normalize")]
    FlatField,

    /// STL data could not be parsed
    #[error("STL parse error: {0}")]
    StlParse(String),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
