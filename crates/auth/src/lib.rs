//! `workforce-auth`: credential verification collaborator.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! normalize a login email and compare a presented secret against a stored one,
//! and nothing about where professional records or admin accounts live.

pub mod admin;
pub mod credentials;
pub mod secret;

pub use admin::{AdminAccount, AdminCredentials};
pub use credentials::{CredentialError, Credentials, normalize_login_email, verify_credentials};
pub use secret::Secret;
