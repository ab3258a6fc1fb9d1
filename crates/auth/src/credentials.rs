//! Login credentials and their verification.

use serde::Deserialize;
use thiserror::Error;

use workforce_core::DomainError;

use crate::Secret;

/// Email + secret pair presented at employee login.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub login_email: String,
    pub secret: Secret,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("login email is required")]
    MissingEmail,

    #[error("login email `{0}` is malformed")]
    MalformedEmail(String),

    #[error("secret is required")]
    MissingSecret,

    /// Unknown email or wrong secret; the two are deliberately indistinguishable.
    #[error("invalid credentials")]
    Invalid,
}

impl From<CredentialError> for DomainError {
    fn from(value: CredentialError) -> Self {
        match value {
            CredentialError::Invalid => DomainError::InvalidCredentials,
            other => DomainError::validation(other.to_string()),
        }
    }
}

/// Normalize a login email for storage and lookup (trimmed, lower-cased).
pub fn normalize_login_email(raw: &str) -> Result<String, CredentialError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CredentialError::MissingEmail);
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(CredentialError::MalformedEmail(email.to_string()));
    }
    Ok(email.to_lowercase())
}

/// Verify presented credentials against the stored account for that email.
///
/// `stored` is what the lookup primitive found for the normalized email, if
/// anything, as the account's key plus its secret. Returns the key of the
/// matching account: an employment code for employees, the email for admins.
pub fn verify_credentials<K: Clone>(
    stored: Option<(&K, &Secret)>,
    presented: &Secret,
) -> Result<K, CredentialError> {
    if presented.is_blank() {
        return Err(CredentialError::MissingSecret);
    }
    match stored {
        Some((code, secret)) if secret.matches(presented) => Ok(code.clone()),
        _ => Err(CredentialError::Invalid),
    }
}
