//! Admin identity domain type.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// A verified admin identity.
///
/// Constructed only after credential verification succeeds; immutable
/// afterwards. `is_admin` is always true for identities minted by the
/// login flow, but it travels with the identity because the session token
/// carries it on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Admin's normalized email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Whether this identity has admin privileges.
    pub is_admin: bool,
}

impl AdminIdentity {
    /// Create an admin identity with an explicit display name.
    #[must_use]
    pub const fn new(email: Email, name: String) -> Self {
        Self {
            email,
            name,
            is_admin: true,
        }
    }

    /// Create an admin identity, deriving the display name from the
    /// email's local part when no richer name is configured.
    ///
    /// `first.last@yourchurch.com` becomes `First Last`.
    #[must_use]
    pub fn with_derived_name(email: Email) -> Self {
        let name = derive_display_name(email.local_part());
        Self::new(email, name)
    }
}

/// Title-case an email local part into a human-readable display name.
///
/// Dots and underscores separate words; each word is capitalized.
fn derive_display_name(local_part: &str) -> String {
    local_part
        .split(['.', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
