//! The employee identity key.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Length of every employment code.
pub const EMPLOYMENT_CODE_LEN: usize = 6;

/// Alphabet used for generated codes (Crockford base32: no I, L, O, U).
const CODE_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Employment code: the identity key shared by an employee's personal,
/// professional and finance records.
///
/// Always exactly [`EMPLOYMENT_CODE_LEN`] ASCII alphanumeric characters, stored
/// upper-cased so `emp001` and `EMP001` name the same employee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmploymentCode(String);

impl EmploymentCode {
    /// Parse and normalize a code supplied by a caller.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("employment code is required"));
        }
        let len = trimmed.chars().count();
        if len != EMPLOYMENT_CODE_LEN {
            return Err(DomainError::invalid_id(format!(
                "EmploymentCode: expected {EMPLOYMENT_CODE_LEN} characters, got {len}"
            )));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_id(format!(
                "EmploymentCode: `{trimmed}` must be ASCII letters and digits"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Generate a fresh random code.
    ///
    /// Uniqueness is not guaranteed here; the identity registry claims the code
    /// and retries on collision.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let code = bytes
            .iter()
            .take(EMPLOYMENT_CODE_LEN)
            .map(|b| CODE_ALPHABET[(*b as usize) % CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmploymentCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmploymentCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmploymentCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmploymentCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmploymentCode> for String {
    fn from(value: EmploymentCode) -> Self {
        value.0
    }
}
