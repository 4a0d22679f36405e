use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

const DEFAULT_FILTER: &str = "info,gatehouse_core=debug";

/// Log to stderr so stdout carries only command output.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
