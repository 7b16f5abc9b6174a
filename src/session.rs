//! Local session gate.
//!
//! The credential check is a placeholder acceptance rule: any email containing
//! `@` together with a password of at least six characters is accepted. It is
//! not an authentication mechanism.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AuthError;
use crate::state::ViewName;
use crate::storage::SessionStore;

pub const TOKEN_KEY: &str = "auth-token";
pub const USER_KEY: &str = "auth-user";
pub const ACTIVE_VIEW_KEY: &str = "active-view";

const MIN_PASSWORD_LEN: usize = 6;
const DEFAULT_ROLE: &str = "analyst";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct SessionGate<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Restores the persisted session. Partial or unparsable state is cleared
    /// and reported as no session.
    pub fn check_auth(&mut self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY);
        let user = self.store.get(USER_KEY);
        if token.is_none() && user.is_none() {
            return None;
        }

        let session = match (token, user) {
            (Some(token), Some(raw_user)) if !token.trim().is_empty() => {
                serde_json::from_str::<User>(&raw_user)
                    .ok()
                    .map(|user| Session { token, user })
            }
            _ => None,
        };

        if session.is_none() {
            tracing::warn!("discarding partial or malformed stored session");
            self.clear_session_keys();
        }
        session
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if !credentials_shape_ok(email, password) {
            tracing::info!("login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = User {
            id: rand::thread_rng().gen_range(1..=u32::MAX as u64),
            display_name: display_name_from_email(email),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
        };
        let session = Session {
            token: issue_token(email),
            user,
        };
        self.persist(&session);
        tracing::info!(user = %session.user.display_name, "session started");
        Ok(session)
    }

    /// Clears the stored session; safe to call with no session present.
    pub fn logout(&mut self) {
        self.clear_session_keys();
        if let Err(err) = self.store.remove(ACTIVE_VIEW_KEY) {
            tracing::warn!("failed to clear active view: {err:#}");
        }
        tracing::info!("session cleared");
    }

    /// The view last marked active, if it names a known view.
    pub fn marked_view(&self) -> Option<ViewName> {
        self.store
            .get(ACTIVE_VIEW_KEY)
            .and_then(|raw| ViewName::from_name(&raw))
    }

    pub fn remember_view(&mut self, view: ViewName) {
        if let Err(err) = self.store.set(ACTIVE_VIEW_KEY, view.as_str()) {
            tracing::warn!("failed to persist active view: {err:#}");
        }
    }

    fn persist(&mut self, session: &Session) {
        let user = match serde_json::to_string(&session.user) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to encode session user: {err}");
                return;
            }
        };
        let stored = self
            .store
            .set(TOKEN_KEY, &session.token)
            .and_then(|_| self.store.set(USER_KEY, &user));
        if let Err(err) = stored {
            tracing::warn!("failed to persist session: {err:#}");
            self.clear_session_keys();
        }
    }

    fn clear_session_keys(&mut self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!("failed to clear {key}: {err:#}");
            }
        }
    }
}

pub fn credentials_shape_ok(email: &str, password: &str) -> bool {
    email.contains('@') && password.chars().count() >= MIN_PASSWORD_LEN
}

/// Capitalized local part of the address, e.g. `coach@football.com` -> `Coach`.
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("").trim();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "User".to_string(),
    }
}

fn issue_token(email: &str) -> String {
    let nonce: u64 = rand::thread_rng().r#gen();
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(now.to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    format!("gt_{}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
}
