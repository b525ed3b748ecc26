//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("basis points out of range: {0}")]
    BasisPointsOutOfRange(u32),
}
