//! User accounts as exposed to administrators.

use serde::{Deserialize, Serialize};

use super::Role;

/// Account record from `GET /users/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub household: Option<i64>,
    #[serde(default)]
    pub household_flat_number: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}
