use std::fs;

use duadeck_core::{ColumnOverride, ResolvedColumns};
use duadeck_engine::{
    forget_document_choice, load_document_choice, save_document_choice, storage_key,
    DocumentChoice, Field, JsonFileStore, MemoryStore, PersistenceStore,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const USER: &str = "aisha@example.com";

#[test]
fn keys_are_namespaced_per_user() {
    assert_eq!(
        storage_key(Field::LastDocument, Some(USER)),
        "lastSpreadsheetId_aisha@example.com"
    );
    assert_eq!(storage_key(Field::BodyColumn, Some("x")), "duasColumnIndex_x");
    assert_eq!(storage_key(Field::AccessToken, None), "accessToken");
}

#[test]
fn memory_store_keeps_users_apart() {
    let store = MemoryStore::new();
    store.set(Some("a@example.com"), Field::LastDocument, "doc-a");
    store.set(Some("b@example.com"), Field::LastDocument, "doc-b");
    store.set(Some("a@example.com"), Field::LastDocument, "doc-a2");

    assert_eq!(
        store.get(Some("a@example.com"), Field::LastDocument).as_deref(),
        Some("doc-a2")
    );
    assert_eq!(
        store.get(Some("b@example.com"), Field::LastDocument).as_deref(),
        Some("doc-b")
    );
    assert_eq!(store.get(None, Field::LastDocument), None);

    store.remove(Some("b@example.com"), Field::LastDocument);
    assert_eq!(store.snapshot().len(), 1);
    store.clear();
    assert!(store.snapshot().is_empty());
}

#[test]
fn document_choice_round_trips() {
    let store = MemoryStore::new();
    save_document_choice(
        &store,
        USER,
        "sheet-1",
        ResolvedColumns {
            name_index: 2,
            body_index: 0,
        },
    );

    assert_eq!(
        store.snapshot().get("nameColumnIndex_aisha@example.com").map(String::as_str),
        Some("2")
    );
    assert_eq!(
        load_document_choice(&store, USER),
        Some(DocumentChoice {
            document_id: "sheet-1".to_string(),
            columns: Some(ColumnOverride {
                name_index: 2,
                body_index: 0,
            }),
        })
    );

    forget_document_choice(&store, USER);
    assert_eq!(load_document_choice(&store, USER), None);
    assert!(store.snapshot().is_empty());
}

#[test]
fn unparsable_column_indices_are_ignored() {
    let store = MemoryStore::new();
    store.set(Some(USER), Field::LastDocument, "sheet-1");
    store.set(Some(USER), Field::NameColumn, "1");
    store.set(Some(USER), Field::BodyColumn, "abc");

    assert_eq!(
        load_document_choice(&store, USER),
        Some(DocumentChoice {
            document_id: "sheet-1".to_string(),
            columns: None,
        })
    );
}

#[test]
fn blank_document_id_counts_as_missing() {
    let store = MemoryStore::new();
    store.set(Some(USER), Field::LastDocument, "   ");
    assert_eq!(load_document_choice(&store, USER), None);
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.set(Some(USER), Field::LastDocument, "sheet-1");
    store.set(None, Field::AccessToken, "tok");
    store.remove(None, Field::AccessToken);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(
        reopened.get(Some(USER), Field::LastDocument).as_deref(),
        Some("sheet-1")
    );
    assert_eq!(reopened.get(None, Field::AccessToken), None);

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk,
        serde_json::json!({ "lastSpreadsheetId_aisha@example.com": "sheet-1" })
    );
}

#[test]
fn file_store_sees_writes_from_other_handles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let first = JsonFileStore::open(&path).unwrap();
    let second = JsonFileStore::open(&path).unwrap();

    second.set(None, Field::User, "{}");
    assert_eq!(first.get(None, Field::User).as_deref(), Some("{}"));
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get(None, Field::AccessToken), None);

    store.set(None, Field::AccessToken, "tok");
    assert_eq!(store.get(None, Field::AccessToken).as_deref(), Some("tok"));
}

#[test]
fn file_store_clear_removes_everything() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
    save_document_choice(
        &store,
        USER,
        "sheet-1",
        ResolvedColumns {
            name_index: 0,
            body_index: 1,
        },
    );
    store.set(None, Field::AccessToken, "tok");

    store.clear();
    assert_eq!(load_document_choice(&store, USER), None);
    assert_eq!(store.get(None, Field::AccessToken), None);
}

#[test]
fn open_rejects_a_file_as_directory() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    assert!(JsonFileStore::open(blocker.join("store.json")).is_err());
}
