use std::sync::Arc;

use duadeck_core::{
    entries_from_table, ColumnKeywords, ColumnOverride, FailureKind, LoadedDocument, SheetError,
};
use engine_logging::{engine_info, engine_warn};

use crate::{load_document_choice, Authenticator, Credential, PersistenceStore, SheetSource, SourceError};

/// Fetches a spreadsheet and turns it into entries, classifying every failure.
///
/// Each call is a single attempt; retrying is up to the user.
pub struct Loader {
    source: Arc<dyn SheetSource>,
    store: Arc<dyn PersistenceStore>,
    auth: Arc<dyn Authenticator>,
    keywords: ColumnKeywords,
}

impl Loader {
    pub fn new(
        source: Arc<dyn SheetSource>,
        store: Arc<dyn PersistenceStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            source,
            store,
            auth,
            keywords: ColumnKeywords::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: ColumnKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Load a specific document, optionally with an explicit column choice.
    pub async fn open(
        &self,
        document_id: &str,
        columns: Option<ColumnOverride>,
    ) -> Result<LoadedDocument, FailureKind> {
        let credential = self.credential()?;
        self.fetch(&credential, document_id, columns, false).await
    }

    /// Load the document remembered for the signed-in user.
    pub async fn reload(&self) -> Result<LoadedDocument, FailureKind> {
        let credential = self.credential()?;
        let choice = load_document_choice(self.store.as_ref(), &credential.identity.email)
            .ok_or(FailureKind::NoPriorDocument)?;
        self.fetch(&credential, &choice.document_id, choice.columns, true)
            .await
    }

    fn credential(&self) -> Result<Credential, FailureKind> {
        self.auth.credential().ok_or_else(|| {
            engine_warn!("No valid credential available");
            FailureKind::CredentialExpired
        })
    }

    async fn fetch(
        &self,
        credential: &Credential,
        document_id: &str,
        columns: Option<ColumnOverride>,
        remembered: bool,
    ) -> Result<LoadedDocument, FailureKind> {
        engine_info!(
            "Loading document {} columns={:?} remembered={}",
            document_id,
            columns,
            remembered
        );
        let table = self
            .source
            .fetch_table(document_id, credential)
            .await
            .map_err(|err| {
                let kind = classify(&err);
                engine_warn!("Fetching {} failed: {} -> {:?}", document_id, err, kind);
                kind
            })?;

        let resolved = match entries_from_table(&table, columns, &self.keywords) {
            // Remembered indices no longer fit the sheet; detect afresh.
            Err(SheetError::InvalidColumns(err)) if remembered => {
                engine_warn!("Stored columns for {} are stale: {}", document_id, err);
                entries_from_table(&table, None, &self.keywords)
            }
            other => other,
        }
        .map_err(|err| FailureKind::from_sheet_error(document_id, err))?;

        engine_info!(
            "Loaded {} entries from {} (name column {}, body column {})",
            resolved.entries.len(),
            document_id,
            resolved.columns.name_index,
            resolved.columns.body_index
        );
        Ok(LoadedDocument {
            document_id: document_id.to_string(),
            columns: resolved.columns,
            entries: resolved.entries,
        })
    }
}

/// Map a source failure onto what the user can do about it.
pub fn classify(err: &SourceError) -> FailureKind {
    match err {
        SourceError::Network(_) => FailureKind::Offline,
        SourceError::Unauthorized => FailureKind::CredentialExpired,
        SourceError::AccessDenied => FailureKind::AccessDenied,
        SourceError::NotFound => FailureKind::NotFound,
        SourceError::HttpStatus(_) | SourceError::TooLarge { .. } | SourceError::Malformed(_) => {
            FailureKind::Unknown(err.to_string())
        }
    }
}
