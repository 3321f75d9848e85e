use url::Url;

/// Bare ids shorter than this are rejected as accidental input.
const MIN_BARE_ID_LEN: usize = 21;

/// Extract a spreadsheet id from a Google Sheets URL or a bare id.
pub fn parse_spreadsheet_input(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(trimmed) {
        return id_from_url(&url);
    }
    // Links pasted without a scheme, e.g. `docs.google.com/spreadsheets/d/<id>`.
    if trimmed.contains('/') {
        return Url::parse(&format!("https://{trimmed}"))
            .ok()
            .and_then(|url| id_from_url(&url));
    }

    if trimmed.len() >= MIN_BARE_ID_LEN && is_id(trimmed) {
        return Some(trimmed.to_string());
    }
    None
}

/// Accepts `/spreadsheets/d/<id>` and the multi-account form
/// `/spreadsheets/u/<n>/d/<id>`.
fn id_from_url(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.by_ref().find(|segment| *segment == "spreadsheets")?;
    let mut next = segments.next()?;
    while next == "u" {
        segments.next()?;
        next = segments.next()?;
    }
    if next != "d" {
        return None;
    }
    segments
        .next()
        .filter(|id| is_id(id))
        .map(ToOwned::to_owned)
}

fn is_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
