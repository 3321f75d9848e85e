use crate::columns::{
    resolve_columns, ColumnError, ColumnKeywords, ColumnOverride, ColumnResolution,
    ResolvedColumns,
};
use crate::entry::{Entry, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("spreadsheet has no rows below the header")]
    EmptySource,
    #[error("no row has both a name and a body")]
    EmptyResult,
}

/// Everything that can stop a table from becoming a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("spreadsheet has no rows below the header")]
    EmptySource,
    #[error("invalid column choice: {0}")]
    InvalidColumns(#[from] ColumnError),
    #[error("could not detect the name and body columns")]
    ColumnsNeeded { headers: Vec<String> },
    #[error("no row has both a name and a body")]
    EmptyResult,
}

impl From<ExtractError> for SheetError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::EmptySource => SheetError::EmptySource,
            ExtractError::EmptyResult => SheetError::EmptyResult,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntries {
    pub columns: ResolvedColumns,
    pub entries: Vec<Entry>,
}

/// Build entries from every data row that has both fields; the header row is skipped.
pub fn extract_entries(
    table: &RawTable,
    columns: ResolvedColumns,
) -> Result<Vec<Entry>, ExtractError> {
    if table.len() < 2 {
        return Err(ExtractError::EmptySource);
    }

    let entries: Vec<Entry> = table
        .data_rows()
        .filter_map(|(row_number, row)| {
            let name = row.get(columns.name_index).map_or("", String::as_str);
            let body = row.get(columns.body_index).map_or("", String::as_str);
            Entry::from_cells(row_number, name, body)
        })
        .collect();

    if entries.is_empty() {
        return Err(ExtractError::EmptyResult);
    }
    Ok(entries)
}

/// Full table-to-entries pipeline: emptiness check, column resolution, extraction.
pub fn entries_from_table(
    table: &RawTable,
    column_override: Option<ColumnOverride>,
    keywords: &ColumnKeywords,
) -> Result<ResolvedEntries, SheetError> {
    if table.len() < 2 {
        return Err(SheetError::EmptySource);
    }
    let columns = match resolve_columns(table.headers(), column_override, keywords)? {
        ColumnResolution::Resolved(columns) => columns,
        ColumnResolution::NeedsManualSelection { headers } => {
            return Err(SheetError::ColumnsNeeded { headers })
        }
    };
    let entries = extract_entries(table, columns)?;
    Ok(ResolvedEntries { columns, entries })
}
