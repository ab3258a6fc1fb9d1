//! Domain error model.

use thiserror::Error;

use crate::group::RecordGroup;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Which unique key a conflicting write collided on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConflictField {
    EmploymentCode,
    LoginEmail,
}

impl core::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConflictField::EmploymentCode => f.write_str("employment code"),
            ConflictField::LoginEmail => f.write_str("login email"),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// uniqueness, lookups). Driver failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (missing or malformed field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A unique key already exists in a record group.
    #[error("conflict: {group} record with {field} `{value}` already exists")]
    Conflict {
        group: RecordGroup,
        field: ConflictField,
        value: String,
    },

    /// A lookup found nothing.
    #[error("{what} not found for `{key}`")]
    NotFound { what: String, key: String },

    /// Login email / secret pair did not match a professional record.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn duplicate_code(group: RecordGroup, code: impl core::fmt::Display) -> Self {
        Self::Conflict {
            group,
            field: ConflictField::EmploymentCode,
            value: code.to_string(),
        }
    }

    pub fn duplicate_login_email(email: impl Into<String>) -> Self {
        Self::Conflict {
            group: RecordGroup::Professional,
            field: ConflictField::LoginEmail,
            value: email.into(),
        }
    }

    pub fn not_found(what: impl Into<String>, key: impl core::fmt::Display) -> Self {
        Self::NotFound {
            what: what.into(),
            key: key.to_string(),
        }
    }

    /// `NotFound` for a record group lookup by identity key.
    pub fn record_not_found(group: RecordGroup, key: impl core::fmt::Display) -> Self {
        Self::not_found(format!("{group} record"), key)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_group_and_key() {
        let err = DomainError::duplicate_code(RecordGroup::Finance, "EMP001");
        assert_eq!(
            err.to_string(),
            "conflict: finance record with employment code `EMP001` already exists"
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn not_found_message_names_group_and_key() {
        let err = DomainError::record_not_found(RecordGroup::Personal, "EMP404");
        assert_eq!(err.to_string(), "personal record not found for `EMP404`");
        assert!(err.is_not_found());
    }
}
