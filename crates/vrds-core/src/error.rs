//! Error types for element encoding.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Content too long: {len} bytes (max {max})")]
    ContentTooLong { len: usize, max: usize },

    #[error("Invalid hex element: {0}")]
    InvalidHex(String),

    #[error("Element does not hold UTF-8 text")]
    InvalidText,
}

pub type Result<T> = std::result::Result<T, CoreError>;
