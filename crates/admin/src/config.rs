//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_SESSION_SECRET` - Session token signing secret (min 32 chars, high entropy)
//! - `ADMIN_CREDENTIALS` - Comma-separated admin allow-list entries, each
//!   `email:password` or `email:password:Display Name`
//! - `BASE_URL` - Public URL for the site (an `https://` prefix enables the
//!   `Secure` cookie attribute)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use yourchurch_core::Email;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Session token signing secret
    pub session_secret: SecretString,
    /// Admin credential allow-list
    pub credentials: Vec<CredentialEntry>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// A single admin allow-list entry.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct CredentialEntry {
    /// Admin's normalized email address.
    pub email: Email,
    /// Admin's password.
    pub password: SecretString,
    /// Display name, when configured explicitly. Derived from the email's
    /// local part otherwise.
    pub name: Option<String>,
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BASE_URL")?;

        let session_secret = get_required_secret("ADMIN_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;
        validate_secret_strength(session_secret.expose_secret(), "ADMIN_SESSION_SECRET")?;

        let credentials = parse_credentials(&get_required_env("ADMIN_CREDENTIALS")?)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            credentials,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    ///
    /// Derived from the base URL: production deployments sit behind HTTPS.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Parse the `ADMIN_CREDENTIALS` allow-list.
///
/// Format: comma-separated entries, each `email:password` or
/// `email:password:Display Name`. Passwords therefore cannot contain `:`
/// or `,`.
fn parse_credentials(raw: &str) -> Result<Vec<CredentialEntry>, ConfigError> {
    let mut entries = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let fields: Vec<&str> = part.split(':').collect();
        let (email, password, name) = match fields.as_slice() {
            [email, password] => (*email, *password, None),
            [email, password, name] => (*email, *password, Some((*name).trim().to_string())),
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "ADMIN_CREDENTIALS".to_string(),
                    "each entry must be email:password or email:password:Display Name"
                        .to_string(),
                ));
            }
        };

        let email = Email::parse(email).map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_CREDENTIALS".to_string(), e.to_string())
        })?;

        if password.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_CREDENTIALS".to_string(),
                format!("empty password for {email}"),
            ));
        }

        entries.push(CredentialEntry {
            email,
            password: SecretString::from(password),
            name: name.filter(|n| !n.is_empty()),
        });
    }

    if entries.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "ADMIN_CREDENTIALS".to_string(),
            "at least one admin credential is required".to_string(),
        ));
    }

    Ok(entries)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real signing secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_credentials_basic() {
        let entries = parse_credentials("admin@yourchurch.com:churchadmin2025").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].email.as_str(), "admin@yourchurch.com");
        assert_eq!(entries[0].password.expose_secret(), "churchadmin2025");
        assert!(entries[0].name.is_none());
    }

    #[test]
    fn test_parse_credentials_with_display_name() {
        let entries =
            parse_credentials("pastor@yourchurch.com:pw12345:Pastor John").unwrap();
        assert_eq!(entries[0].name.as_deref(), Some("Pastor John"));
    }

    #[test]
    fn test_parse_credentials_multiple() {
        let entries = parse_credentials(
            "admin@yourchurch.com:churchadmin2025, media@yourchurch.com:pw2:Media Team",
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].email.as_str(), "media@yourchurch.com");
    }

    #[test]
    fn test_parse_credentials_normalizes_email() {
        let entries = parse_credentials("Admin@YourChurch.COM:churchadmin2025").unwrap();
        assert_eq!(entries[0].email.as_str(), "admin@yourchurch.com");
    }

    #[test]
    fn test_parse_credentials_rejects_empty() {
        assert!(parse_credentials("").is_err());
        assert!(parse_credentials("  , ,").is_err());
    }

    #[test]
    fn test_parse_credentials_rejects_missing_password() {
        assert!(parse_credentials("admin@yourchurch.com").is_err());
        assert!(parse_credentials("admin@yourchurch.com:").is_err());
    }

    #[test]
    fn test_parse_credentials_rejects_bad_email() {
        assert!(parse_credentials("not-an-email:pw").is_err());
    }

    #[test]
    fn test_credential_entry_debug_redacts_password() {
        let entry = CredentialEntry {
            email: Email::parse("admin@yourchurch.com").unwrap(),
            password: SecretString::from("super_secret_password"),
            name: None,
        };

        let debug_output = format!("{entry:?}");
        assert!(debug_output.contains("admin@yourchurch.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));
    }

    #[test]
    fn test_cookie_secure_follows_base_url() {
        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://yourchurch.com".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            credentials: vec![],
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert!(config.cookie_secure());

        let config = AppConfig {
            base_url: "http://localhost:3000".to_string(),
            ..config
        };
        assert!(!config.cookie_secure());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            credentials: vec![],
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
