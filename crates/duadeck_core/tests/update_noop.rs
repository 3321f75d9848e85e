use duadeck_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::seeded(1);
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state.view(), next.view());
    assert_eq!(state.deck().snapshot(), next.deck().snapshot());
    assert!(effects.is_empty());
}

#[test]
fn navigation_before_sign_in_is_ignored() {
    let mut state = AppState::seeded(1);
    for msg in [
        Msg::NextClicked,
        Msg::BackClicked,
        Msg::RepeatClicked,
        Msg::DoneClicked,
        Msg::ChangeDocumentClicked,
        Msg::DocumentSubmitted("1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms".to_string()),
        Msg::ColumnsChosen {
            name_index: 0,
            body_index: 1,
        },
    ] {
        let (next, effects) = update(state, msg);
        assert!(effects.is_empty());
        state = next;
    }
    assert!(!state.consume_dirty());
}
