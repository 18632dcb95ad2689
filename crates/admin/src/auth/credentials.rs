//! Admin credential store.
//!
//! Decides whether an email may enter the admin area at all and whether a
//! given (email, password) pair is correct. Built once at startup from
//! configuration; read-only afterwards.
//!
//! Unknown email and wrong password are deliberately indistinguishable to
//! the `validate_login` caller: both are `None`, so the login response
//! cannot be used to enumerate admin accounts.

use secrecy::{ExposeSecret, SecretString};

use yourchurch_core::{AdminIdentity, Email};

use crate::config::CredentialEntry;

use super::constant_time_compare;

/// One configured admin, with its identity resolved up front.
struct StoredCredential {
    identity: AdminIdentity,
    password: SecretString,
}

/// The configured admin allow-list.
pub struct CredentialStore {
    entries: Vec<StoredCredential>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl CredentialStore {
    /// Build the store from configured entries.
    ///
    /// Display names fall back to the title-cased local part of the email
    /// when the configuration does not provide one.
    #[must_use]
    pub fn from_config(entries: &[CredentialEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|entry| {
                let identity = match &entry.name {
                    Some(name) => AdminIdentity::new(entry.email.clone(), name.clone()),
                    None => AdminIdentity::with_derived_name(entry.email.clone()),
                };
                StoredCredential {
                    identity,
                    password: entry.password.clone(),
                }
            })
            .collect();

        Self { entries }
    }

    /// Whether the email is on the admin allow-list (case-insensitive).
    #[must_use]
    pub fn is_authorized_email(&self, email: &str) -> bool {
        Email::parse(email).is_ok_and(|email| {
            self.entries
                .iter()
                .any(|entry| entry.identity.email == email)
        })
    }

    /// Validate a login attempt, failing closed.
    ///
    /// Returns the admin's identity on success. Unknown email, missing
    /// password, and wrong password all return `None`. The password check
    /// is constant-time.
    #[must_use]
    pub fn validate_login(&self, email: &str, password: &str) -> Option<AdminIdentity> {
        let email = Email::parse(email).ok()?;

        let entry = self
            .entries
            .iter()
            .find(|entry| entry.identity.email == email)?;

        constant_time_compare(
            entry.password.expose_secret().as_bytes(),
            password.as_bytes(),
        )
        .then(|| entry.identity.clone())
    }
}
