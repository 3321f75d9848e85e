use crate::{FailureKind, LoadedDocument, RequestId, UserIdentity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Authenticator produced a user; resume their last document.
    SignedIn(UserIdentity),
    /// User signed out from the profile menu or a recovery prompt.
    SignedOut,
    /// User pasted a spreadsheet URL or id, or picked one.
    DocumentSubmitted(String),
    /// User picked the two columns by hand.
    ColumnsChosen { name_index: usize, body_index: usize },
    /// User clicked Next or swiped.
    NextClicked,
    /// User clicked Back.
    BackClicked,
    /// User asked to see the same entries again.
    RepeatClicked,
    /// User clicked Done on an exhausted deck.
    DoneClicked,
    /// User wants to pick another spreadsheet.
    ChangeDocumentClicked,
    /// Engine completion for a load request.
    DocumentLoaded {
        request_id: RequestId,
        result: Result<LoadedDocument, FailureKind>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
