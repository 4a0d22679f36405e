//! Device push-token registration with the backend.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::storage::{PUSH_TOKEN_SENT_KEY, Storage};

/// Result of [`DeviceRegistration::register`]. None of these is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// The same token was already sent from this client.
    AlreadyRegistered,
    /// No token was available.
    Skipped,
    Failed(String),
}

pub struct DeviceRegistration {
    backend: Arc<dyn Backend>,
    store: Arc<dyn Storage>,
}

impl DeviceRegistration {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn Storage>) -> Self {
        Self { backend, store }
    }

    /// Send `token` to the backend unless it was the last one sent.
    ///
    /// The de-dup marker is only written after the backend accepts the token,
    /// so a failed attempt is retried next time.
    pub async fn register(&self, token: &str) -> RegistrationOutcome {
        let token = token.trim();
        if token.is_empty() {
            debug!("no push token available");
            return RegistrationOutcome::Skipped;
        }

        match self.store.get(PUSH_TOKEN_SENT_KEY) {
            Ok(Some(sent)) if sent == token => {
                debug!("push token already registered");
                return RegistrationOutcome::AlreadyRegistered;
            }
            Ok(_) => {}
            Err(e) => warn!("could not read push token marker: {e}"),
        }

        if let Err(e) = self.backend.register_push_token(token).await {
            warn!("push token registration failed: {e}");
            return RegistrationOutcome::Failed(e.to_string());
        }
        info!("push token registered");

        if let Err(e) = self.store.set(PUSH_TOKEN_SENT_KEY, token) {
            warn!("could not store push token marker: {e}");
        }
        RegistrationOutcome::Registered
    }
}
