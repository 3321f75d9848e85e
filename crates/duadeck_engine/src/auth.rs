use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use duadeck_core::UserIdentity;
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};

use crate::{Field, PersistenceStore};

/// Bearer token plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub identity: UserIdentity,
    /// Milliseconds since the Unix epoch.
    pub expires_at_ms: u64,
}

impl Credential {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

pub trait Authenticator: Send + Sync {
    /// The current credential, or `None` when signed out or expired.
    fn credential(&self) -> Option<Credential>;
    /// Drop the stored credential and identity.
    fn forget_credential(&self);
    /// Drop everything the app stored, for every field.
    fn sign_out(&self);
}

pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedUser {
    name: String,
    email: String,
    #[serde(default, rename = "picture", skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

/// Credential kept in a [`PersistenceStore`] under the bare (not per-user) keys.
pub struct StoredAuthenticator {
    store: Arc<dyn PersistenceStore>,
    clock: Clock,
}

impl StoredAuthenticator {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self::with_clock(store, system_clock())
    }

    pub fn with_clock(store: Arc<dyn PersistenceStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Record a credential handed over by the login flow.
    pub fn store_credential(&self, credential: &Credential) {
        let user = PersistedUser {
            name: credential.identity.name.clone(),
            email: credential.identity.email.clone(),
            avatar_url: credential.identity.avatar_url.clone(),
        };
        let user = match serde_json::to_string(&user) {
            Ok(json) => json,
            Err(err) => {
                engine_warn!("Failed to serialize user identity: {}", err);
                return;
            }
        };
        self.store.set(None, Field::AccessToken, &credential.token);
        self.store.set(None, Field::User, &user);
        self.store.set(
            None,
            Field::TokenExpiry,
            &credential.expires_at_ms.to_string(),
        );
    }
}

impl Authenticator for StoredAuthenticator {
    fn credential(&self) -> Option<Credential> {
        let token = self.store.get(None, Field::AccessToken)?;
        let user = self.store.get(None, Field::User)?;
        let expiry = self.store.get(None, Field::TokenExpiry)?;

        let Ok(expires_at_ms) = expiry.trim().parse::<u64>() else {
            engine_warn!("Ignoring stored credential with invalid expiry {:?}", expiry);
            return None;
        };
        let user: PersistedUser = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(err) => {
                engine_warn!("Ignoring stored credential with invalid user: {}", err);
                return None;
            }
        };

        let credential = Credential {
            token,
            identity: UserIdentity {
                name: user.name,
                email: user.email,
                avatar_url: user.avatar_url,
            },
            expires_at_ms,
        };
        if credential.is_expired((self.clock)()) {
            engine_info!("Stored credential expired, clearing it");
            self.forget_credential();
            return None;
        }
        Some(credential)
    }

    fn forget_credential(&self) {
        for field in [Field::AccessToken, Field::User, Field::TokenExpiry] {
            self.store.remove(None, field);
        }
    }

    fn sign_out(&self) {
        self.store.clear();
    }
}
