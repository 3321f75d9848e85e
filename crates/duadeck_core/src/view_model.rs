use crate::{Phase, RecoveryPlan};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub user_name: Option<String>,
    pub document_id: Option<String>,
    /// A load is in flight; navigation controls are disabled.
    pub busy: bool,
    pub card: Option<CardView>,
    pub position: usize,
    pub total: usize,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub exhausted: bool,
    pub empty_source: bool,
    pub recovery: Option<RecoveryPlan>,
    pub error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub attribution: String,
    pub body: String,
}
