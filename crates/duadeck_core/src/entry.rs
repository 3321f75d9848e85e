pub type EntryId = usize;

/// One card: an attribution paired with a body of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub id: EntryId,
    pub attribution: String,
    pub body: String,
}

impl Entry {
    /// Builds an entry from untrimmed cells. Returns `None` unless both
    /// fields are non-empty after trimming.
    pub fn from_cells(id: EntryId, attribution: &str, body: &str) -> Option<Self> {
        let attribution = attribution.trim();
        let body = body.trim();
        if attribution.is_empty() || body.is_empty() {
            return None;
        }
        Some(Self {
            id,
            attribution: attribution.to_string(),
            body: body.to_string(),
        })
    }
}

pub type Row = Vec<String>;

/// Parsed tabular data. Row 0 is the header.
///
/// Cells are always trimmed and rows with no content are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    rows: Vec<Row>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes arbitrary rows: trims every cell and drops blank rows.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row.into_iter().map(|cell| cell.as_ref().to_string()).collect());
        }
        table
    }

    pub(crate) fn push_row(&mut self, row: Row) {
        let row: Row = row.into_iter().map(|cell| cell.trim().to_string()).collect();
        if row.iter().all(String::is_empty) {
            return;
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows after the header, paired with their row number (first data row is 1).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
