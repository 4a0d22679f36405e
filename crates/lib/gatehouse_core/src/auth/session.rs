//! Session guard. Projects the stored credential into a [`Session`].

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::{debug, info, warn};

use super::AuthError;
use crate::models::{Role, TokenClaims};
use crate::storage::{ACCESS_TOKEN_KEY, Storage, StorageError, purge_credentials};

/// Authentication state derived from the stored credential.
///
/// Never stored. Re-derive it with [`SessionGuard::evaluate`] at every
/// navigation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated {
        role: Role,
        username: Option<String>,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Role of an authenticated session; `None` when anonymous.
    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { role, .. } => Some(*role),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { username, .. } => username.as_deref(),
        }
    }
}

/// Decode the claims of an access credential.
///
/// The signature is not checked: the client holds no key and the backend
/// re-verifies every request. Expiry is compared by the caller.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(format!("jwt decode: {e}")))
}

/// Derives the [`Session`] from persisted state, purging bad credentials.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn Storage>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Evaluate against the current wall clock.
    pub fn evaluate(&self) -> Session {
        self.evaluate_at(Utc::now().timestamp())
    }

    /// Evaluate against `now` (unix seconds).
    ///
    /// A credential is valid iff it decodes and `exp > now`. Anything else
    /// purges both credentials.
    pub fn evaluate_at(&self, now: i64) -> Session {
        let token = match self.store.get(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return Session::Anonymous,
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!("stored state is unreadable, purging: {e}");
                self.purge();
                return Session::Anonymous;
            }
            Err(e) => {
                warn!("failed to read credential: {e}");
                return Session::Anonymous;
            }
        };

        match decode_claims(&token) {
            Ok(claims) if claims.exp > now => {
                debug!(exp = claims.exp, "credential valid");
                Session::Authenticated {
                    role: claims.role.unwrap_or(Role::Unknown),
                    username: claims.username,
                }
            }
            Ok(claims) => {
                info!(exp = claims.exp, now, "credential expired, purging");
                self.purge();
                Session::Anonymous
            }
            Err(e) => {
                warn!("failed to decode credential, purging: {e}");
                self.purge();
                Session::Anonymous
            }
        }
    }

    fn purge(&self) {
        if let Err(e) = purge_credentials(self.store.as_ref()) {
            warn!("failed to purge credentials: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::models::{Role, TokenClaims};

    /// Sign a token the way the backend would.
    pub fn token(exp: i64, role: Option<Role>, username: Option<&str>) -> String {
        let claims = TokenClaims {
            exp,
            role,
            username: username.map(str::to_string),
            user_id: Some(1),
            household_id: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .expect("encode")
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::token;
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage, PUSH_TOKEN_SENT_KEY, REFRESH_TOKEN_KEY};

    const NOW: i64 = 1_800_000_000;

    fn guard_with(access: Option<&str>) -> (SessionGuard, Arc<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        if let Some(access) = access {
            store.set(ACCESS_TOKEN_KEY, access).unwrap();
            store.set(REFRESH_TOKEN_KEY, "refresh").unwrap();
        }
        (SessionGuard::new(store.clone()), store)
    }

    #[test]
    fn no_credential_is_anonymous() {
        let (guard, _) = guard_with(None);
        let session = guard.evaluate_at(NOW);
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn valid_credential_yields_role() {
        let (guard, store) = guard_with(Some(&token(NOW + 60, Some(Role::Guard), Some("gate1"))));
        let session = guard.evaluate_at(NOW);
        assert_eq!(session.role(), Some(Role::Guard));
        assert_eq!(session.username(), Some("gate1"));
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_some());
    }

    #[test]
    fn missing_role_defaults_to_unknown() {
        let (guard, _) = guard_with(Some(&token(NOW + 60, None, None)));
        assert_eq!(guard.evaluate_at(NOW).role(), Some(Role::Unknown));
    }

    #[test]
    fn expired_credential_is_purged() {
        for exp in [NOW - 3600, NOW - 1, NOW] {
            let (guard, store) = guard_with(Some(&token(exp, Some(Role::Admin), None)));
            store.set(PUSH_TOKEN_SENT_KEY, "device").unwrap();
            assert_eq!(guard.evaluate_at(NOW), Session::Anonymous, "exp={exp}");
            assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
            assert!(store.get(REFRESH_TOKEN_KEY).unwrap().is_none());
            assert!(store.get(PUSH_TOKEN_SENT_KEY).unwrap().is_some());
        }
    }

    #[test]
    fn undecodable_credential_is_purged() {
        for garbage in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            let (guard, store) = guard_with(Some(garbage));
            assert_eq!(guard.evaluate_at(NOW), Session::Anonymous, "{garbage:?}");
            assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn unreadable_storage_is_purged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"accessToken": "x""#).unwrap();
        let store = Arc::new(FileStorage::new(&path));
        let guard = SessionGuard::new(store.clone());

        assert_eq!(guard.evaluate_at(NOW), Session::Anonymous);
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());

        let fresh = token(NOW + 60, Some(Role::Resident), None);
        store.set(ACCESS_TOKEN_KEY, &fresh).unwrap();
        assert!(guard.evaluate_at(NOW).is_authenticated());
    }

    #[test]
    fn evaluation_is_not_cached() {
        let (guard, store) = guard_with(Some(&token(NOW + 60, Some(Role::Resident), None)));
        assert!(guard.evaluate_at(NOW).is_authenticated());
        store.remove(ACCESS_TOKEN_KEY).unwrap();
        assert!(!guard.evaluate_at(NOW).is_authenticated());
    }

    #[test]
    fn signature_is_not_required_to_match() {
        let claims = decode_claims(&token(NOW, Some(Role::Admin), Some("root"))).unwrap();
        assert_eq!(claims.exp, NOW);
        assert_eq!(claims.role, Some(Role::Admin));
    }
}
