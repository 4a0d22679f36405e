use gatehouse_core::api::ApiError;
use gatehouse_core::auth::LoginError;
use gatehouse_core::storage::StorageError;
use gatehouse_core::views::DashboardError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("Not logged in. Run `gatehouse login <username>` first.")]
    NotLoggedIn,

    #[error("Error: Unknown Role")]
    UnknownRole,

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Logging: {}", .0)]
    Logging(String),

    #[error("{}", .0)]
    Storage(#[from] StorageError),

    #[error("{}", .0)]
    Api(#[from] ApiError),

    #[error("{}", .0)]
    Login(#[from] LoginError),

    #[error("{}", .0)]
    Dashboard(#[from] DashboardError),

    #[error("Invalid payload: {}", .0)]
    Json(#[from] serde_json::Error),
}
