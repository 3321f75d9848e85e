use crate::{
    parse_spreadsheet_input, AppState, ColumnOverride, DeckStatus, Effect, FailureKind, Msg,
    Phase, RequestKind,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SignedIn(identity) => {
            state.sign_in(identity);
            let request_id = state.begin_request(RequestKind::Resume);
            vec![Effect::Reload { request_id }]
        }
        Msg::SignedOut => {
            state.sign_out();
            vec![Effect::SignOut]
        }
        Msg::DocumentSubmitted(input) => {
            if state.identity().is_none() || state.is_busy() {
                return (state, Vec::new());
            }
            match parse_spreadsheet_input(&input) {
                Some(document_id) => {
                    let request_id = state.begin_request(RequestKind::Open);
                    vec![Effect::FetchDocument {
                        request_id,
                        document_id,
                        columns: None,
                    }]
                }
                None => {
                    state.set_error("Please enter a valid Google Sheets URL or spreadsheet ID.");
                    Vec::new()
                }
            }
        }
        Msg::ColumnsChosen {
            name_index,
            body_index,
        } => {
            let document_id = match state.phase() {
                Phase::SelectingColumns { document_id, .. } => Some(document_id.clone()),
                _ => None,
            };
            let Some(document_id) = document_id.filter(|_| !state.is_busy()) else {
                return (state, Vec::new());
            };
            if name_index == body_index {
                state.set_error("Name and body columns must be different.");
                return (state, Vec::new());
            }
            let request_id = state.begin_request(RequestKind::Open);
            vec![Effect::FetchDocument {
                request_id,
                document_id,
                columns: Some(ColumnOverride {
                    name_index,
                    body_index,
                }),
            }]
        }
        Msg::NextClicked => {
            if can_navigate(&state) && state.deck_mut().advance() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BackClicked => {
            if can_navigate(&state) && state.deck_mut().retreat() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RepeatClicked => {
            if can_navigate(&state) && state.deck().status() != DeckStatus::EmptySource {
                state.deck_mut().reset();
                state.clear_feedback();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DoneClicked => {
            if can_navigate(&state) && state.deck().status() == DeckStatus::Exhausted {
                let request_id = state.begin_request(RequestKind::Reload);
                vec![Effect::Reload { request_id }]
            } else {
                Vec::new()
            }
        }
        Msg::ChangeDocumentClicked => {
            let user_email = state.user_email().map(ToOwned::to_owned);
            match user_email {
                Some(user_email) => {
                    state.change_document();
                    vec![Effect::ForgetDocument { user_email }]
                }
                None => Vec::new(),
            }
        }
        Msg::DocumentLoaded { request_id, result } => {
            let Some(kind) = state.take_pending(request_id) else {
                return (state, Vec::new());
            };
            match result {
                Ok(document) => {
                    let remember = state.user_email().map(|user_email| Effect::RememberDocument {
                        user_email: user_email.to_string(),
                        document_id: document.document_id.clone(),
                        columns: document.columns,
                    });
                    state.apply_loaded(document);
                    remember.into_iter().collect()
                }
                Err(failure) => apply_failure(&mut state, kind, failure),
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn can_navigate(state: &AppState) -> bool {
    *state.phase() == Phase::Reading && !state.is_busy()
}

fn apply_failure(state: &mut AppState, kind: RequestKind, failure: FailureKind) -> Vec<Effect> {
    let mut effects = Vec::new();
    if failure == FailureKind::CredentialExpired {
        effects.push(Effect::ForgetCredential);
    }

    match failure {
        FailureKind::ColumnsNeeded {
            document_id,
            headers,
        } => {
            state.select_columns(document_id, headers);
        }
        FailureKind::NoPriorDocument => {
            state.show_picker();
        }
        failure => {
            if kind == RequestKind::Resume && failure.invalidates_document() {
                if let Some(user_email) = state.user_email() {
                    effects.push(Effect::ForgetDocument {
                        user_email: user_email.to_string(),
                    });
                }
            }
            match kind {
                // A failed reload keeps the exhausted deck, so repeating it is a real option.
                RequestKind::Reload => state.set_recovery(Some(failure.recovery())),
                RequestKind::Open if matches!(state.phase(), Phase::SelectingColumns { .. }) => {}
                RequestKind::Open | RequestKind::Resume => state.show_picker(),
            }
            state.set_error(failure.to_string());
        }
    }
    effects
}
