use std::time::Duration;

use duadeck_core::{parse_csv, RawTable};
use engine_logging::engine_debug;
use futures_util::StreamExt;
use serde::Deserialize;
use url::Url;

use crate::{Credential, SheetSource, SourceError};

/// How the spreadsheet contents are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetFormat {
    /// Sheets API v4: first sheet title from the metadata, then its values.
    #[default]
    Values,
    /// CSV export of the first sheet.
    Csv,
}

#[derive(Debug, Clone)]
pub struct SheetSettings {
    pub api_base: String,
    pub export_base: String,
    pub format: SheetFormat,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com/v4".to_string(),
            export_base: "https://docs.google.com".to_string(),
            format: SheetFormat::Values,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub struct ReqwestSheetSource {
    settings: SheetSettings,
}

impl ReqwestSheetSource {
    pub fn new(settings: SheetSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SourceError::Network(err.to_string()))
    }

    fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = Url::parse(base)
            .map_err(|err| SourceError::Malformed(format!("invalid base url {base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Malformed(format!("base url {base} cannot have a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_values(
        &self,
        client: &reqwest::Client,
        document_id: &str,
        token: &str,
    ) -> Result<RawTable, SourceError> {
        let mut metadata_url =
            self.endpoint(&self.settings.api_base, &["spreadsheets", document_id])?;
        metadata_url
            .query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let metadata: SpreadsheetMetadata =
            decode_json(&self.get_bytes(client, metadata_url, token).await?)?;

        let title = metadata
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| SourceError::Malformed("spreadsheet has no sheets".to_string()))?;
        engine_debug!("Reading sheet {:?} of {}", title, document_id);

        let values_url = self.endpoint(
            &self.settings.api_base,
            &["spreadsheets", document_id, "values", &title],
        )?;
        let range: ValueRange = decode_json(&self.get_bytes(client, values_url, token).await?)?;
        Ok(RawTable::from_rows(
            range
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect::<Vec<_>>()),
        ))
    }

    async fn fetch_csv(
        &self,
        client: &reqwest::Client,
        document_id: &str,
        token: &str,
    ) -> Result<RawTable, SourceError> {
        let mut url = self.endpoint(
            &self.settings.export_base,
            &["spreadsheets", "d", document_id, "export"],
        )?;
        url.query_pairs_mut().append_pair("format", "csv");
        let bytes = self.get_bytes(client, url, token).await?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(parse_csv(text.trim_start_matches('\u{feff}')))
    }

    async fn get_bytes(
        &self,
        client: &reqwest::Client,
        url: Url,
        token: &str,
    ) -> Result<Vec<u8>, SourceError> {
        let response = client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| SourceError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::from_status(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(SourceError::TooLarge { max_bytes });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| SourceError::Network(err.to_string()))?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(SourceError::TooLarge { max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SheetSource for ReqwestSheetSource {
    async fn fetch_table(
        &self,
        document_id: &str,
        credential: &Credential,
    ) -> Result<RawTable, SourceError> {
        let client = self.build_client()?;
        match self.settings.format {
            SheetFormat::Values => {
                self.fetch_values(&client, document_id, &credential.token)
                    .await
            }
            SheetFormat::Csv => self.fetch_csv(&client, document_id, &credential.token).await,
        }
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, SourceError> {
    serde_json::from_slice(bytes).map_err(|err| SourceError::Malformed(err.to_string()))
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
