/// Header keywords used to locate the two roles when no explicit choice exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKeywords {
    pub name: String,
    pub body: String,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            body: "dua".to_string(),
        }
    }
}

/// Explicit column choice, either picked by the user or restored from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOverride {
    pub name_index: usize,
    pub body_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub name_index: usize,
    pub body_index: usize,
}

impl From<ResolvedColumns> for ColumnOverride {
    fn from(columns: ResolvedColumns) -> Self {
        Self {
            name_index: columns.name_index,
            body_index: columns.body_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnResolution {
    Resolved(ResolvedColumns),
    /// Headers as display labels, ready for a manual picker.
    NeedsManualSelection { headers: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("column {index} is out of range ({columns} columns available)")]
    OutOfRange { index: usize, columns: usize },
    #[error("name and body must be different columns (both are {index})")]
    Colliding { index: usize },
}

/// Map the name and body roles onto physical columns.
///
/// An override is validated and used as is. Without one, the leftmost header
/// containing each keyword (case-insensitive) wins.
pub fn resolve_columns(
    headers: &[String],
    column_override: Option<ColumnOverride>,
    keywords: &ColumnKeywords,
) -> Result<ColumnResolution, ColumnError> {
    if let Some(choice) = column_override {
        return validate_override(headers.len(), choice).map(ColumnResolution::Resolved);
    }

    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let name_keyword = keywords.name.trim().to_lowercase();
    let body_keyword = keywords.body.trim().to_lowercase();
    let name_index = normalized.iter().position(|h| h.contains(&name_keyword));
    let body_index = normalized.iter().position(|h| h.contains(&body_keyword));

    match (name_index, body_index) {
        (Some(name_index), Some(body_index)) if name_index != body_index => {
            Ok(ColumnResolution::Resolved(ResolvedColumns {
                name_index,
                body_index,
            }))
        }
        _ => Ok(ColumnResolution::NeedsManualSelection {
            headers: column_choices(headers),
        }),
    }
}

/// Display labels for a column picker; empty headers become `Column N`.
pub fn column_choices(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            if header.trim().is_empty() {
                format!("Column {}", index + 1)
            } else {
                header.clone()
            }
        })
        .collect()
}

fn validate_override(columns: usize, choice: ColumnOverride) -> Result<ResolvedColumns, ColumnError> {
    for index in [choice.name_index, choice.body_index] {
        if index >= columns {
            return Err(ColumnError::OutOfRange { index, columns });
        }
    }
    if choice.name_index == choice.body_index {
        return Err(ColumnError::Colliding {
            index: choice.name_index,
        });
    }
    Ok(ResolvedColumns {
        name_index: choice.name_index,
        body_index: choice.body_index,
    })
}
