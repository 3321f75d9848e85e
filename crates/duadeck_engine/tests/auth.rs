use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use duadeck_core::{ResolvedColumns, UserIdentity};
use duadeck_engine::{
    save_document_choice, Authenticator, Clock, Credential, Field, MemoryStore, PersistenceStore,
    StoredAuthenticator,
};
use pretty_assertions::assert_eq;

fn credential(expires_at_ms: u64) -> Credential {
    Credential {
        token: "tok-123".to_string(),
        identity: UserIdentity {
            name: "Aisha".to_string(),
            email: "aisha@example.com".to_string(),
            avatar_url: Some("https://example.com/a.png".to_string()),
        },
        expires_at_ms,
    }
}

fn fixed_clock(now: Arc<AtomicU64>) -> Clock {
    Arc::new(move || now.load(Ordering::SeqCst))
}

#[test]
fn expiry_is_inclusive() {
    let credential = credential(1_000);
    assert!(!credential.is_expired(999));
    assert!(credential.is_expired(1_000));
}

#[test]
fn stored_credential_round_trips() {
    let store = Arc::new(MemoryStore::new());
    let now = Arc::new(AtomicU64::new(500));
    let auth = StoredAuthenticator::with_clock(store.clone(), fixed_clock(now));

    assert_eq!(auth.credential(), None);
    auth.store_credential(&credential(1_000));

    assert_eq!(auth.credential(), Some(credential(1_000)));
    let user = store.get(None, Field::User).unwrap();
    let user: serde_json::Value = serde_json::from_str(&user).unwrap();
    assert_eq!(user["picture"], "https://example.com/a.png");
    assert_eq!(store.get(None, Field::TokenExpiry).as_deref(), Some("1000"));
}

#[test]
fn expired_credential_is_cleared() {
    let store = Arc::new(MemoryStore::new());
    let now = Arc::new(AtomicU64::new(500));
    let auth = StoredAuthenticator::with_clock(store.clone(), fixed_clock(now.clone()));
    auth.store_credential(&credential(1_000));

    now.store(1_000, Ordering::SeqCst);
    assert_eq!(auth.credential(), None);
    assert!(store.snapshot().is_empty());
}

#[test]
fn invalid_stored_values_mean_signed_out() {
    let store = Arc::new(MemoryStore::new());
    let auth = StoredAuthenticator::with_clock(
        store.clone(),
        fixed_clock(Arc::new(AtomicU64::new(0))),
    );
    store.set(None, Field::AccessToken, "tok");
    store.set(None, Field::User, "{\"name\":\"A\",\"email\":\"a@example.com\"}");
    store.set(None, Field::TokenExpiry, "soon");
    assert_eq!(auth.credential(), None);

    store.set(None, Field::TokenExpiry, "10");
    store.set(None, Field::User, "not json");
    assert_eq!(auth.credential(), None);

    store.set(None, Field::User, "{\"name\":\"A\",\"email\":\"a@example.com\"}");
    let restored = auth.credential().unwrap();
    assert_eq!(restored.identity.avatar_url, None);
}

#[test]
fn forget_credential_keeps_document_choice() {
    let store = Arc::new(MemoryStore::new());
    let auth = StoredAuthenticator::with_clock(
        store.clone(),
        fixed_clock(Arc::new(AtomicU64::new(0))),
    );
    auth.store_credential(&credential(1_000));
    save_document_choice(
        store.as_ref(),
        "aisha@example.com",
        "sheet-1",
        ResolvedColumns {
            name_index: 0,
            body_index: 1,
        },
    );

    auth.forget_credential();
    assert_eq!(auth.credential(), None);
    assert_eq!(store.snapshot().len(), 3);
}

#[test]
fn sign_out_clears_every_field() {
    let store = Arc::new(MemoryStore::new());
    let auth = StoredAuthenticator::with_clock(
        store.clone(),
        fixed_clock(Arc::new(AtomicU64::new(0))),
    );
    auth.store_credential(&credential(1_000));
    save_document_choice(
        store.as_ref(),
        "aisha@example.com",
        "sheet-1",
        ResolvedColumns {
            name_index: 0,
            body_index: 1,
        },
    );

    auth.sign_out();
    assert!(store.snapshot().is_empty());
}
