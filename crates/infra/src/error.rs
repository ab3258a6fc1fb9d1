//! Store operation errors.

use thiserror::Error;

use workforce_core::DomainError;

/// Error returned by record stores, the identity registry and the project graph.
///
/// Domain failures (conflict, not found, validation) pass through unchanged so
/// callers can match on them; anything the storage driver reports that has no
/// domain meaning becomes `Backend`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }

    pub fn poisoned(operation: &'static str) -> Self {
        Self::backend(operation, "lock poisoned")
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            StoreError::Backend { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.domain().is_some_and(DomainError::is_not_found)
    }

    pub fn is_conflict(&self) -> bool {
        self.domain().is_some_and(DomainError::is_conflict)
    }
}

/// Turn a `NotFound` into `None`, keeping every other failure.
pub(crate) fn absent_if_not_found<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
