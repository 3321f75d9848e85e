use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use duadeck_core::{ColumnOverride, ResolvedColumns};
use engine_logging::engine_debug;

/// Fields kept in the store. The key names are part of the stored format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LastDocument,
    NameColumn,
    BodyColumn,
    AccessToken,
    User,
    TokenExpiry,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::LastDocument => "lastSpreadsheetId",
            Field::NameColumn => "nameColumnIndex",
            Field::BodyColumn => "duasColumnIndex",
            Field::AccessToken => "accessToken",
            Field::User => "user",
            Field::TokenExpiry => "tokenExpiry",
        }
    }
}

/// `{field}_{user}`, or the bare field name when there is no user.
pub fn storage_key(field: Field, user: Option<&str>) -> String {
    match user {
        Some(user) => format!("{}_{}", field.name(), user),
        None => field.name().to_string(),
    }
}

/// String key-value storage, last write wins.
pub trait PersistenceStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&self, key: &str, value: &str);
    fn remove_raw(&self, key: &str);
    fn clear(&self);

    fn get(&self, user: Option<&str>, field: Field) -> Option<String> {
        self.get_raw(&storage_key(field, user))
    }

    fn set(&self, user: Option<&str>, field: Field, value: &str) {
        self.set_raw(&storage_key(field, user), value);
    }

    fn remove(&self, user: Option<&str>, field: Field) {
        self.remove_raw(&storage_key(field, user));
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove_raw(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// The remembered spreadsheet of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChoice {
    pub document_id: String,
    /// Only present when both stored indices parse.
    pub columns: Option<ColumnOverride>,
}

pub fn load_document_choice(store: &dyn PersistenceStore, user: &str) -> Option<DocumentChoice> {
    let document_id = store
        .get(Some(user), Field::LastDocument)
        .filter(|id| !id.trim().is_empty())?;
    let index = |field: Field| {
        store
            .get(Some(user), field)
            .and_then(|value| value.trim().parse::<usize>().ok())
    };
    let columns = match (index(Field::NameColumn), index(Field::BodyColumn)) {
        (Some(name_index), Some(body_index)) => Some(ColumnOverride {
            name_index,
            body_index,
        }),
        _ => None,
    };
    Some(DocumentChoice {
        document_id,
        columns,
    })
}

pub fn save_document_choice(
    store: &dyn PersistenceStore,
    user: &str,
    document_id: &str,
    columns: ResolvedColumns,
) {
    engine_debug!("Remembering document {} for {}", document_id, user);
    store.set(Some(user), Field::LastDocument, document_id);
    store.set(Some(user), Field::NameColumn, &columns.name_index.to_string());
    store.set(Some(user), Field::BodyColumn, &columns.body_index.to_string());
}

pub fn forget_document_choice(store: &dyn PersistenceStore, user: &str) {
    engine_debug!("Forgetting document for {}", user);
    for field in [Field::LastDocument, Field::NameColumn, Field::BodyColumn] {
        store.remove(Some(user), field);
    }
}
