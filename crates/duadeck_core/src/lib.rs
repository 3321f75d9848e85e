//! Duadeck core: spreadsheet parsing, the card deck and the pure session state machine.
mod columns;
mod deck;
mod document;
mod effect;
mod entry;
mod extract;
mod identity;
mod load;
mod msg;
mod state;
mod table;
mod update;
mod view_model;

pub use columns::{
    column_choices, resolve_columns, ColumnError, ColumnKeywords, ColumnOverride,
    ColumnResolution, ResolvedColumns,
};
pub use deck::{shuffle, Deck, DeckSnapshot, DeckStatus, SwipedEntry};
pub use document::parse_spreadsheet_input;
pub use effect::Effect;
pub use entry::{Entry, EntryId, RawTable, Row};
pub use extract::{entries_from_table, extract_entries, ExtractError, ResolvedEntries, SheetError};
pub use identity::UserIdentity;
pub use load::{FailureKind, LoadedDocument, RecoveryPlan, RequestId, RequestKind};
pub use msg::Msg;
pub use state::{AppState, Phase};
pub use table::{parse_csv, parse_csv_strict, ParseError};
pub use update::update;
pub use view_model::{AppViewModel, CardView};
