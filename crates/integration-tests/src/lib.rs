//! Integration tests for the YourChurch admin API.
//!
//! Each test serves the real router in-process on an ephemeral port and
//! drives it with a cookie-storing `reqwest` client, so no external
//! services or environment variables are needed.
//!
//! Run with: `cargo test -p yourchurch-integration-tests`

use secrecy::SecretString;

use yourchurch_admin::config::{AppConfig, CredentialEntry};
use yourchurch_admin::routes;
use yourchurch_admin::state::AppState;
use yourchurch_core::Email;

/// A test server plus the base URL it listens on.
pub struct TestContext {
    /// Cookie-storing HTTP client.
    pub client: reqwest::Client,
    /// Base URL of the in-process server (http://127.0.0.1:PORT).
    pub base_url: String,
}

impl TestContext {
    /// Spawn the admin app on an ephemeral port with test credentials.
    ///
    /// The allow-list contains `admin@yourchurch.com` / `churchadmin2025`
    /// and `mary.jones@yourchurch.com` / `shepherd-the-flock`.
    ///
    /// # Panics
    ///
    /// Panics if the listener or client cannot be created.
    pub async fn spawn() -> Self {
        let config = test_config();
        let state = AppState::new(config);
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server error");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Full URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in as the default test admin.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    pub async fn login_as_admin(&self) {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({
                "email": "admin@yourchurch.com",
                "password": "churchadmin2025",
            }))
            .send()
            .await
            .expect("Login request failed");
        assert!(resp.status().is_success(), "login rejected: {}", resp.status());
    }
}

/// Configuration for the in-process test server.
///
/// # Panics
///
/// Panics if the fixture emails are invalid.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://127.0.0.1:0".to_string(),
        session_secret: SecretString::from("kJ8#mN2$pQ5&rT9!vW3@xZ6^aB1*cD4%"),
        credentials: vec![
            CredentialEntry {
                email: Email::parse("admin@yourchurch.com").expect("valid email"),
                password: SecretString::from("churchadmin2025"),
                name: None,
            },
            CredentialEntry {
                email: Email::parse("mary.jones@yourchurch.com").expect("valid email"),
                password: SecretString::from("shepherd-the-flock"),
                name: Some("Pastor Mary".to_string()),
            },
        ],
        sentry_dsn: None,
        sentry_environment: None,
    }
}
