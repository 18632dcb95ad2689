//! Admin authentication core.
//!
//! Three pieces, wired together by the HTTP layer:
//!
//! - [`credentials`] - the configured allow-list and login validation
//! - [`token`] - the signed, self-contained session token codec
//! - [`session`] - cookie policy binding the codec to HTTP
//!
//! There is exactly one token decode implementation
//! ([`token::TokenCodec::decode`]); every read path, whether handler-level
//! or extractor-level, goes through it.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{SESSION_COOKIE_NAME, SessionManager};
pub use token::{SessionToken, TokenCodec, TokenError};

/// Constant-time byte comparison to prevent timing attacks.
///
/// Used for both password checks and token signature checks. Unequal
/// lengths return early; for the signature check both sides are
/// fixed-length hex digests, and for passwords the length of the stored
/// password is not considered sensitive.
pub(crate) fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
