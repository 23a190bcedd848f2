use thiserror::Error;

use crate::OpResult;

/// Tree errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Key and mask differ in length, or the mask's leading bit is clear.
    #[error("invalid key/mask")]
    InvalidKeyMask,
    #[error("invalid key length {0}")]
    InvalidKeyLength(usize),
    #[error("insert failed")]
    InsertFailed,
    #[error("key not found")]
    KeyNotFound,
    /// An adapter could not turn its textual key into bytes.
    #[error("invalid address {0}")]
    InvalidAddress(String),
}

impl TreeError {
    /// The result code reported alongside this error.
    pub fn op_result(&self) -> OpResult {
        match self {
            TreeError::KeyNotFound => OpResult::NoMatch,
            _ => OpResult::Error,
        }
    }
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
