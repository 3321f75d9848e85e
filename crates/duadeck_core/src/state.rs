use crate::deck::{Deck, DeckStatus};
use crate::view_model::{AppViewModel, CardView};
use crate::{LoadedDocument, RecoveryPlan, RequestId, RequestKind, UserIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    SignedOut,
    ChoosingDocument,
    SelectingColumns {
        document_id: String,
        /// Display labels, one per column.
        headers: Vec<String>,
    },
    Reading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    id: RequestId,
    kind: RequestKind,
}

#[derive(Debug, Clone)]
pub struct AppState {
    phase: Phase,
    identity: Option<UserIdentity>,
    document_id: Option<String>,
    deck: Deck,
    pending: Option<PendingRequest>,
    next_request_id: RequestId,
    recovery: Option<RecoveryPlan>,
    error: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_deck(Deck::new())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose shuffles are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_deck(Deck::seeded(seed))
    }

    fn with_deck(deck: Deck) -> Self {
        Self {
            phase: Phase::SignedOut,
            identity: None,
            document_id: None,
            deck,
            pending: None,
            next_request_id: 1,
            recovery: None,
            error: None,
            dirty: false,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.email.as_str())
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> AppViewModel {
        let reading = self.phase == Phase::Reading;
        let busy = self.is_busy();
        let status = self.deck.status();
        AppViewModel {
            phase: self.phase.clone(),
            user_name: self.identity.as_ref().map(|identity| identity.name.clone()),
            document_id: self.document_id.clone(),
            busy,
            card: if reading {
                self.deck.current().map(|entry| CardView {
                    attribution: entry.attribution.clone(),
                    body: entry.body.clone(),
                })
            } else {
                None
            },
            position: self.deck.position(),
            total: self.deck.total(),
            can_go_back: reading && !busy && self.deck.can_retreat(),
            can_go_next: reading && !busy && self.deck.can_advance(),
            exhausted: reading && status == DeckStatus::Exhausted,
            empty_source: reading && status == DeckStatus::EmptySource,
            recovery: self.recovery,
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub(crate) fn begin_request(&mut self, kind: RequestKind) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending = Some(PendingRequest { id, kind });
        self.error = None;
        self.recovery = None;
        self.dirty = true;
        id
    }

    /// Claims the pending request if `request_id` is the one in flight.
    pub(crate) fn take_pending(&mut self, request_id: RequestId) -> Option<RequestKind> {
        match self.pending {
            Some(pending) if pending.id == request_id && self.identity.is_some() => {
                self.pending = None;
                self.dirty = true;
                Some(pending.kind)
            }
            _ => None,
        }
    }

    pub(crate) fn sign_in(&mut self, identity: UserIdentity) {
        self.identity = Some(identity);
        self.phase = Phase::ChoosingDocument;
        self.document_id = None;
        self.deck.load(Vec::new());
        self.pending = None;
        self.recovery = None;
        self.error = None;
        self.dirty = true;
    }

    /// Drops everything tied to the user. Request ids keep counting so that
    /// results from before the sign-out can never match.
    pub(crate) fn sign_out(&mut self) {
        self.identity = None;
        self.phase = Phase::SignedOut;
        self.document_id = None;
        self.deck.load(Vec::new());
        self.pending = None;
        self.recovery = None;
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn apply_loaded(&mut self, document: LoadedDocument) {
        self.deck.load(document.entries);
        self.document_id = Some(document.document_id);
        self.phase = Phase::Reading;
        self.recovery = None;
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn change_document(&mut self) {
        self.phase = Phase::ChoosingDocument;
        self.document_id = None;
        self.deck.load(Vec::new());
        self.pending = None;
        self.recovery = None;
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn select_columns(&mut self, document_id: String, headers: Vec<String>) {
        self.phase = Phase::SelectingColumns {
            document_id,
            headers,
        };
        self.dirty = true;
    }

    pub(crate) fn show_picker(&mut self) {
        self.phase = Phase::ChoosingDocument;
        self.dirty = true;
    }

    pub(crate) fn set_recovery(&mut self, recovery: Option<RecoveryPlan>) {
        self.recovery = recovery;
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn clear_feedback(&mut self) {
        if self.error.is_some() || self.recovery.is_some() {
            self.error = None;
            self.recovery = None;
            self.dirty = true;
        }
    }
}
