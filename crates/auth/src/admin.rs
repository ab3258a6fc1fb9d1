//! Administrator accounts.

use serde::Deserialize;

use crate::{CredentialError, Secret, normalize_login_email};

/// An administrator allowed into the admin-facing views.
///
/// The email is normalized like an employee login email, so admin lookup is
/// case-insensitive as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    email: String,
    secret: Secret,
}

impl AdminAccount {
    pub fn new(email: &str, secret: Secret) -> Result<Self, CredentialError> {
        let email = normalize_login_email(email)?;
        if secret.is_blank() {
            return Err(CredentialError::MissingSecret);
        }
        Ok(Self { email, secret })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }
}

/// Email + secret pair presented at admin login.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub secret: Secret,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify_credentials;

    #[test]
    fn email_is_normalized_and_secret_required() {
        let admin = AdminAccount::new(" Root@Co.com ", Secret::new("pw")).unwrap();
        assert_eq!(admin.email(), "root@co.com");

        assert_eq!(
            AdminAccount::new("root@co.com", Secret::new(" ")),
            Err(CredentialError::MissingSecret)
        );
        assert!(matches!(
            AdminAccount::new("root", Secret::new("pw")),
            Err(CredentialError::MalformedEmail(_))
        ));
    }

    #[test]
    fn verification_resolves_to_the_admin_email() {
        let admin = AdminAccount::new("root@co.com", Secret::new("pw")).unwrap();
        let stored = Some((&admin.email, admin.secret()));

        assert_eq!(
            verify_credentials(stored, &Secret::new("pw")).unwrap(),
            "root@co.com"
        );
        assert_eq!(
            verify_credentials(stored, &Secret::new("nope")),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn credentials_deserialize_from_json() {
        let creds: AdminCredentials =
            serde_json::from_value(serde_json::json!({ "email": "root@co.com", "secret": "pw" }))
                .unwrap();
        assert_eq!(creds.email, "root@co.com");
        assert_eq!(creds.secret.expose(), "pw");
    }
}
