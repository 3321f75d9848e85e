use crate::{ColumnOverride, RequestId, ResolvedColumns};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDocument {
        request_id: RequestId,
        document_id: String,
        columns: Option<ColumnOverride>,
    },
    /// Re-open the document remembered for the signed-in user.
    Reload { request_id: RequestId },
    RememberDocument {
        user_email: String,
        document_id: String,
        columns: ResolvedColumns,
    },
    ForgetDocument { user_email: String },
    /// Drop the stored credential; it can never succeed again.
    ForgetCredential,
    SignOut,
}
