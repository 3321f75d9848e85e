//! Duadeck engine: spreadsheet IO, persistence, credentials and effect execution.
mod auth;
mod engine;
mod file_store;
mod loader;
mod session;
mod sheets;
mod source;
mod store;

pub use auth::{system_clock, Authenticator, Clock, Credential, StoredAuthenticator};
pub use engine::{EngineEvent, EngineHandle};
pub use file_store::{ensure_store_dir, JsonFileStore, StoreError};
pub use loader::{classify, Loader};
pub use session::Session;
pub use sheets::{ReqwestSheetSource, SheetFormat, SheetSettings};
pub use source::{SheetSource, SourceError};
pub use store::{
    forget_document_choice, load_document_choice, save_document_choice, storage_key,
    DocumentChoice, Field, MemoryStore, PersistenceStore,
};
