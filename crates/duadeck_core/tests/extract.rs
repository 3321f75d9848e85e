use duadeck_core::{
    entries_from_table, extract_entries, ColumnError, ColumnKeywords, ColumnOverride, Entry,
    ExtractError, RawTable, ResolvedColumns, SheetError,
};
use pretty_assertions::assert_eq;

const COLUMNS: ResolvedColumns = ResolvedColumns {
    name_index: 0,
    body_index: 1,
};

#[test]
fn rows_missing_either_field_are_dropped() {
    let table = RawTable::from_rows([
        vec!["Name", "Duas"],
        vec!["Ali", "O Allah"],
        vec!["", "orphan text"],
        vec!["Sara", ""],
    ]);
    let entries = extract_entries(&table, COLUMNS).unwrap();
    assert_eq!(
        entries,
        vec![Entry {
            id: 1,
            attribution: "Ali".to_string(),
            body: "O Allah".to_string(),
        }]
    );
}

#[test]
fn ids_follow_source_rows() {
    let table = RawTable::from_rows([
        vec!["Name", "Duas"],
        vec!["A", ""],
        vec!["B", "two"],
        vec!["C", "three"],
    ]);
    let ids: Vec<_> = extract_entries(&table, COLUMNS)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn short_rows_count_as_missing_cells() {
    let table = RawTable::from_rows([vec!["Name", "Duas"], vec!["Only name"]]);
    assert_eq!(
        extract_entries(&table, COLUMNS).unwrap_err(),
        ExtractError::EmptyResult
    );
}

#[test]
fn header_only_table_is_empty_source() {
    let table = RawTable::from_rows([vec!["Name", "Duas"]]);
    assert_eq!(
        extract_entries(&table, COLUMNS).unwrap_err(),
        ExtractError::EmptySource
    );
    assert_eq!(
        extract_entries(&RawTable::new(), COLUMNS).unwrap_err(),
        ExtractError::EmptySource
    );
}

#[test]
fn pipeline_returns_resolved_columns() {
    let table = RawTable::from_rows([
        vec!["Duas", "Name"],
        vec!["Rabbana atina", "Yusuf"],
    ]);
    let resolved = entries_from_table(&table, None, &ColumnKeywords::default()).unwrap();
    assert_eq!(
        resolved.columns,
        ResolvedColumns {
            name_index: 1,
            body_index: 0,
        }
    );
    assert_eq!(resolved.entries[0].attribution, "Yusuf");
}

#[test]
fn pipeline_reports_columns_needed_with_labels() {
    let table = RawTable::from_rows([vec!["Who", ""], vec!["x", "y"]]);
    let err = entries_from_table(&table, None, &ColumnKeywords::default()).unwrap_err();
    assert_eq!(
        err,
        SheetError::ColumnsNeeded {
            headers: vec!["Who".to_string(), "Column 2".to_string()],
        }
    );
}

#[test]
fn pipeline_checks_emptiness_before_columns() {
    let table = RawTable::from_rows([vec!["A", "B"]]);
    let err = entries_from_table(&table, None, &ColumnKeywords::default()).unwrap_err();
    assert_eq!(err, SheetError::EmptySource);
}

#[test]
fn pipeline_rejects_invalid_override() {
    let table = RawTable::from_rows([vec!["A", "B"], vec!["x", "y"]]);
    let err = entries_from_table(
        &table,
        Some(ColumnOverride {
            name_index: 1,
            body_index: 1,
        }),
        &ColumnKeywords::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SheetError::InvalidColumns(ColumnError::Colliding { index: 1 })
    );
}
