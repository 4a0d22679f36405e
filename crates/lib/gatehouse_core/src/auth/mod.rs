//! Authentication: credential decoding, session projection, login/logout.
//!
//! There is no silent renewal. The refresh credential is stored on login and
//! purged on logout, but an expired access credential always forces a new
//! login.

pub mod login;
pub mod session;

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

pub use login::Authenticator;
pub use session::{Session, SessionGuard, decode_claims};

/// Credential decoding errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Login failures, worded for direct display.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Username and password are required.")]
    MissingCredentials,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Login failed: {0}")]
    Request(ApiError),

    #[error("Login failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for LoginError {
    fn from(e: ApiError) -> Self {
        if e.is_unauthorized() {
            LoginError::InvalidCredentials
        } else {
            LoginError::Request(e)
        }
    }
}
