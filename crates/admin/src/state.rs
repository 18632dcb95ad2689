//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{CredentialStore, SessionManager};
use crate::config::AppConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything behind the `Arc` is read-only after startup.
/// Only the derived credential store and session manager are retained;
/// the rest of the configuration is consumed at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    credentials: CredentialStore,
    sessions: SessionManager,
}

impl AppState {
    /// Build the application state from loaded configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let credentials = CredentialStore::from_config(&config.credentials);
        let sessions =
            SessionManager::new(config.session_secret.clone(), config.cookie_secure());

        Self {
            inner: Arc::new(AppStateInner {
                credentials,
                sessions,
            }),
        }
    }

    /// The admin credential allow-list.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// The session manager.
    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }
}
