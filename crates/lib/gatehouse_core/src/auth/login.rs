//! Login and logout.

use std::sync::Arc;

use tracing::{info, warn};

use super::LoginError;
use super::session::{Session, SessionGuard};
use crate::api::Backend;
use crate::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, Storage, StorageError, purge_credentials};

/// Drives the LoggedOut ⇄ LoggedIn transitions.
#[derive(Clone)]
pub struct Authenticator {
    backend: Arc<dyn Backend>,
    store: Arc<dyn Storage>,
}

impl Authenticator {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn Storage>) -> Self {
        Self { backend, store }
    }

    /// Exchange username/password for credentials and persist them.
    ///
    /// Returns the session derived from the new credential.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        info!(username, "attempting login");
        let tokens = self.backend.obtain_token(username, password).await.map_err(|e| {
            warn!(username, "login failed: {e}");
            LoginError::from(e)
        })?;

        self.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        info!(username, "login successful");

        Ok(SessionGuard::new(self.store.clone()).evaluate())
    }

    /// Drop both credentials. No backend call is made.
    pub fn logout(&self) -> Result<(), StorageError> {
        purge_credentials(self.store.as_ref())?;
        info!("logged out");
        Ok(())
    }
}
