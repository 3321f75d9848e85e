use std::iter::Peekable;
use std::str::Chars;

use crate::entry::{RawTable, Row};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated quoted cell starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("unexpected text after closing quote in cell starting on line {line}")]
    TextAfterQuote { line: usize },
}

/// Parse comma-separated text, recovering from malformed quoting.
///
/// - `""` inside a quoted cell is a literal quote
/// - quoted cells keep delimiters and line breaks verbatim
/// - text after a closing quote is appended to the cell
/// - an unterminated quote swallows the rest of the input
pub fn parse_csv(text: &str) -> RawTable {
    let (table, _issues) = Parser::new(text).run();
    table
}

/// Same grammar as [`parse_csv`], but malformed quoting is an error.
pub fn parse_csv_strict(text: &str) -> Result<RawTable, ParseError> {
    let (table, issues) = Parser::new(text).run();
    match issues.into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(table),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Start,
    Unquoted,
    Quoted,
    AfterQuote,
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    table: RawTable,
    row: Row,
    cell: String,
    state: CellState,
    line: usize,
    cell_line: usize,
    issues: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            table: RawTable::new(),
            row: Row::new(),
            cell: String::new(),
            state: CellState::Start,
            line: 1,
            cell_line: 1,
            issues: Vec::new(),
        }
    }

    fn run(mut self) -> (RawTable, Vec<ParseError>) {
        while let Some(c) = self.chars.next() {
            match self.state {
                CellState::Start | CellState::Unquoted => self.unquoted(c),
                CellState::Quoted => self.quoted(c),
                CellState::AfterQuote => self.after_quote(c),
            }
        }
        if self.state == CellState::Quoted {
            self.issues.push(ParseError::UnterminatedQuote {
                line: self.cell_line,
            });
        }
        self.end_row();
        (self.table, self.issues)
    }

    fn unquoted(&mut self, c: char) {
        match c {
            ',' => self.end_cell(),
            '\r' | '\n' => self.line_break(c),
            // Whitespace before an opening quote is not part of the cell.
            '"' if self.cell.trim().is_empty() => {
                self.cell.clear();
                self.cell_line = self.line;
                self.state = CellState::Quoted;
            }
            _ => {
                self.cell.push(c);
                self.state = CellState::Unquoted;
            }
        }
    }

    fn quoted(&mut self, c: char) {
        match c {
            '"' if self.chars.peek() == Some(&'"') => {
                self.chars.next();
                self.cell.push('"');
            }
            '"' => self.state = CellState::AfterQuote,
            '\n' => {
                self.cell.push(c);
                self.line += 1;
            }
            '\r' => {
                self.cell.push(c);
                if self.chars.peek() != Some(&'\n') {
                    self.line += 1;
                }
            }
            _ => self.cell.push(c),
        }
    }

    fn after_quote(&mut self, c: char) {
        match c {
            ',' => self.end_cell(),
            '\r' | '\n' => self.line_break(c),
            c if c.is_whitespace() => {}
            _ => {
                let issue = ParseError::TextAfterQuote {
                    line: self.cell_line,
                };
                if self.issues.last() != Some(&issue) {
                    self.issues.push(issue);
                }
                self.cell.push(c);
            }
        }
    }

    fn line_break(&mut self, c: char) {
        if c == '\r' && self.chars.peek() == Some(&'\n') {
            self.chars.next();
        }
        self.end_row();
        self.line += 1;
    }

    fn end_cell(&mut self) {
        self.row.push(std::mem::take(&mut self.cell));
        self.state = CellState::Start;
    }

    fn end_row(&mut self) {
        self.end_cell();
        let row = std::mem::take(&mut self.row);
        self.table.push_row(row);
    }
}
