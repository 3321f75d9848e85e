use std::fmt;

use crate::columns::ResolvedColumns;
use crate::entry::Entry;
use crate::extract::SheetError;

pub type RequestId = u64;

/// Why a load was started; decides how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Re-open the remembered document right after sign-in.
    Resume,
    /// Open a document the user just picked.
    Open,
    /// Fetch the remembered document again after the deck ran out.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document_id: String,
    pub columns: ResolvedColumns,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No remembered document for this user.
    NoPriorDocument,
    /// The transport never got an HTTP response.
    Offline,
    CredentialExpired,
    AccessDenied,
    NotFound,
    ColumnsNeeded {
        document_id: String,
        headers: Vec<String>,
    },
    InvalidColumns(String),
    EmptySource,
    EmptyResult,
    Unknown(String),
}

impl FailureKind {
    pub fn from_sheet_error(document_id: &str, err: SheetError) -> Self {
        match err {
            SheetError::EmptySource => FailureKind::EmptySource,
            SheetError::EmptyResult => FailureKind::EmptyResult,
            SheetError::InvalidColumns(err) => FailureKind::InvalidColumns(err.to_string()),
            SheetError::ColumnsNeeded { headers } => FailureKind::ColumnsNeeded {
                document_id: document_id.to_string(),
                headers,
            },
        }
    }

    pub fn recovery(&self) -> RecoveryPlan {
        match self {
            FailureKind::NoPriorDocument => RecoveryPlan::PickDocument,
            FailureKind::CredentialExpired => RecoveryPlan::SignOutRequired,
            FailureKind::ColumnsNeeded { .. } => RecoveryPlan::SelectColumns,
            FailureKind::Offline
            | FailureKind::AccessDenied
            | FailureKind::NotFound
            | FailureKind::InvalidColumns(_)
            | FailureKind::EmptySource
            | FailureKind::EmptyResult
            | FailureKind::Unknown(_) => RecoveryPlan::RepeatOrSignOut,
        }
    }

    /// Whether a remembered document should be dropped after this failure.
    pub fn invalidates_document(&self) -> bool {
        matches!(
            self,
            FailureKind::AccessDenied
                | FailureKind::NotFound
                | FailureKind::InvalidColumns(_)
                | FailureKind::EmptySource
                | FailureKind::EmptyResult
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NoPriorDocument => write!(f, "no spreadsheet has been opened yet"),
            FailureKind::Offline => write!(f, "you appear to be offline"),
            FailureKind::CredentialExpired => {
                write!(f, "authentication expired, please sign in again")
            }
            FailureKind::AccessDenied => write!(
                f,
                "access denied, make sure the spreadsheet is shared with you"
            ),
            FailureKind::NotFound => write!(f, "spreadsheet not found"),
            FailureKind::ColumnsNeeded { .. } => {
                write!(f, "could not detect the name and body columns")
            }
            FailureKind::InvalidColumns(message) => write!(f, "invalid column choice: {message}"),
            FailureKind::EmptySource => write!(f, "spreadsheet is empty"),
            FailureKind::EmptyResult => write!(f, "no valid entries found in the spreadsheet"),
            FailureKind::Unknown(message) => write!(f, "failed to load spreadsheet: {message}"),
        }
    }
}

/// What the user is offered after a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPlan {
    /// Show the same entries again, or sign out.
    RepeatOrSignOut,
    /// Both options are shown, but only signing out can succeed.
    SignOutRequired,
    SelectColumns,
    PickDocument,
}
