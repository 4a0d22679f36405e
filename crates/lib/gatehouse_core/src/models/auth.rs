//! Authentication models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Role claim carried by an access credential.
///
/// Any value the client does not recognise maps to [`Role::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Resident,
    Guard,
    Admin,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "RESIDENT",
            Role::Guard => "GUARD",
            Role::Admin => "ADMIN",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Parse a role claim. Never fails.
    pub fn from_claim(claim: &str) -> Self {
        match claim {
            "RESIDENT" => Role::Resident,
            "GUARD" => Role::Guard,
            "ADMIN" => Role::Admin,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_claim(&raw))
    }
}

/// Claims embedded in the backend's access tokens.
///
/// `exp` is required; everything else is optional because only resident
/// tokens carry a household and older tokens may lack the custom claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<i64>,
}

/// Response body of `POST /token/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
