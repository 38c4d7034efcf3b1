//! Boundary error model.
//!
//! Every failure that leaves the ledger is a [`DispatchError`] carrying one of
//! six [`ErrorKind`]s and a human-readable message. Nothing is retried.

use thiserror::Error;

use winechain_core::DomainError;

use crate::codec::CodecError;
use crate::record_store::RecordStoreError;

/// Failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Conflict,
    InvalidState,
    StorageError,
    CodecError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InvalidState => "InvalidState",
            ErrorKind::StorageError => "StorageError",
            ErrorKind::CodecError => "CodecError",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Wrong arity, unparsable argument or a payload that failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate key or a stale version lost a compare-and-swap.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No transition is defined for the product's current stage.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Storage(RecordStoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DispatchError::NotFound(_) => ErrorKind::NotFound,
            DispatchError::Conflict(_) => ErrorKind::Conflict,
            DispatchError::InvalidState(_) => ErrorKind::InvalidState,
            DispatchError::Storage(_) => ErrorKind::StorageError,
            DispatchError::Codec(_) => ErrorKind::CodecError,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DispatchError::InvalidArgument(msg.into())
    }
}

impl From<RecordStoreError> for DispatchError {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::Concurrency(msg) => DispatchError::Conflict(msg),
            other => DispatchError::Storage(other),
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::InvalidArgument(msg),
            DomainError::InvalidId(msg) => DispatchError::InvalidArgument(msg),
            DomainError::InvalidState(msg) => DispatchError::InvalidState(msg),
            DomainError::NotFound => DispatchError::NotFound("product not found".to_string()),
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
        }
    }
}
