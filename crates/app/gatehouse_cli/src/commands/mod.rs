//! Subcommand implementations.

pub mod chat;
pub mod dashboard;
pub mod device;
pub mod session;
pub mod visitors;

use std::sync::Arc;

use gatehouse_core::api::ApiClient;
use gatehouse_core::auth::{Session, SessionGuard};
use gatehouse_core::config::ClientConfig;
use gatehouse_core::notify::LocalPushChannel;
use gatehouse_core::storage::{FileStorage, Storage};
use tracing::debug;

use crate::cli::Cli;
use crate::{Error, Result};

/// Everything a command needs: configuration, persisted state, the
/// gateway client and the in-process push channel.
pub struct Context {
    pub config: ClientConfig,
    pub store: Arc<dyn Storage>,
    pub client: Arc<ApiClient>,
    pub push: LocalPushChannel,
}

impl Context {
    /// Environment defaults, overridden by command-line flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &cli.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(path) = &cli.storage {
            config.storage_path = path.clone();
        }
        debug!(api = %config.api_base_url, storage = %config.storage_path.display(), "client configured");

        let store: Arc<dyn Storage> = Arc::new(FileStorage::new(config.storage_path.clone()));
        let client = Arc::new(ApiClient::new(&config, store.clone())?);
        Ok(Self {
            config,
            store,
            client,
            push: LocalPushChannel::default(),
        })
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store.clone())
    }

    /// The current session; an error if there is none.
    ///
    /// An expired credential is purged here, before any backend call.
    pub fn require_session(&self) -> Result<Session> {
        match self.guard().evaluate() {
            Session::Anonymous => Err(Error::NotLoggedIn),
            session => Ok(session),
        }
    }
}
