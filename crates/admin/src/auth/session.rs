//! Session manager: cookie policy bound to the token codec.
//!
//! Sessions are stateless. The cookie value is the whole session; there is
//! no server-side store, so clearing the cookie is the only form of logout
//! and an exfiltrated token stays valid until its expiry.
//!
//! Cookie policy: HttpOnly, SameSite=Lax, Path=/, 7-day Max-Age, Secure
//! when the site is served over HTTPS.

use chrono::{Duration, Utc};
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use secrecy::SecretString;

use yourchurch_core::AdminIdentity;

use super::token::{SessionToken, TokenCodec, TokenError};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "admin-session";

/// Session lifetime in seconds (7 days).
const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Issues, reads, and clears the admin session cookie.
#[derive(Debug, Clone)]
pub struct SessionManager {
    codec: TokenCodec,
    secure: bool,
}

impl SessionManager {
    /// Create a session manager.
    ///
    /// `secure` controls the cookie's `Secure` attribute and should be true
    /// whenever the site is served over HTTPS.
    #[must_use]
    pub const fn new(secret: SecretString, secure: bool) -> Self {
        Self {
            codec: TokenCodec::new(secret),
            secure,
        }
    }

    /// Mint a new 7-day session for a verified identity.
    ///
    /// Returns the decoded token alongside the cookie to set.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if the token cannot be encoded, which
    /// indicates a bug rather than bad input.
    pub fn create_session(
        &self,
        identity: &AdminIdentity,
    ) -> Result<(SessionToken, Cookie<'static>), TokenError> {
        let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECONDS);
        let wire = self.codec.encode(identity, expires_at)?;

        let cookie = self.build_cookie(wire, CookieDuration::seconds(SESSION_TTL_SECONDS));

        let token = SessionToken {
            email: identity.email.clone(),
            display_name: identity.name.clone(),
            is_admin: identity.is_admin,
            expires_at,
        };

        Ok((token, cookie))
    }

    /// Read a session from a raw cookie value.
    ///
    /// This is the single decode path. Absent cookie, bad signature,
    /// malformed payload, and expiry all collapse to `None`; the internal
    /// reason is logged at debug level for operators.
    #[must_use]
    pub fn session_from_cookie(&self, cookie_value: Option<&str>) -> Option<SessionToken> {
        let value = cookie_value?;

        match self.codec.decode(value) {
            Ok(token) => Some(token),
            Err(reason) => {
                tracing::debug!(%reason, "rejected admin session cookie");
                None
            }
        }
    }

    /// Read a session straight from an inbound `Cookie` header.
    ///
    /// Thin adapter over [`Self::session_from_cookie`] for contexts that
    /// hold the request rather than an extracted cookie value.
    #[must_use]
    pub fn session_from_cookie_header(&self, header: Option<&str>) -> Option<SessionToken> {
        let value = header.and_then(|header| {
            Cookie::split_parse(header.to_owned())
                .filter_map(Result::ok)
                .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
                .map(|cookie| cookie.value().to_owned())
        });

        self.session_from_cookie(value.as_deref())
    }

    /// A removal cookie that deletes the session client-side.
    ///
    /// Idempotent: clearing an already-cleared session is a no-op.
    #[must_use]
    pub fn clear_cookie(&self) -> Cookie<'static> {
        self.build_cookie(String::new(), CookieDuration::ZERO)
    }

    fn build_cookie(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(max_age)
            .build()
    }
}
