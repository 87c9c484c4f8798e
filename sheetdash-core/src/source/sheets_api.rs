//! Google Sheets API v4 source
//!
//! Fetches `spreadsheets/{id}/values/{sheet}` with a caller-supplied bearer
//! token. How the token is obtained is up to the caller.

use super::GridSource;
use crate::error::SourceError;
use crate::grid::RawGrid;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// A spreadsheet behind the Sheets API
pub struct SheetsApiSource {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    document: String,
    access_token: String,
}

impl SheetsApiSource {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        document: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            document: document.into(),
            access_token: access_token.into(),
        }
    }

    /// Point the source at another API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self, sheet: &str) -> Result<Url, String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid API base URL {}: {}", self.base_url, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("API base URL {} cannot take a path", self.base_url))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&quote_sheet_name(sheet));
        Ok(url)
    }
}

impl GridSource for SheetsApiSource {
    fn document(&self) -> &str {
        &self.document
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError> {
        let transport = |message: String| SourceError::Transport {
            sheet: sheet.to_string(),
            message,
        };

        let url = self.values_url(sheet).map_err(transport)?;
        debug!(sheet, %url, "fetching worksheet values");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")])
            .send()
            .map_err(|e| transport(e.to_string()))?;

        check_status(response.status(), &self.document, sheet)?;

        let body: ValueRange = response.json().map_err(|e| transport(e.to_string()))?;
        Ok(values_to_grid(body.values))
    }
}

/// Map a non-success response to the source failure it stands for.
///
/// A document the token cannot open is as good as missing.
fn check_status(status: StatusCode, document: &str, sheet: &str) -> Result<(), SourceError> {
    match status {
        status if status.is_success() => Ok(()),
        StatusCode::NOT_FOUND | StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
            Err(SourceError::DocumentNotFound {
                document: document.to_string(),
            })
        }
        // The API answers an unknown sheet with "Unable to parse range".
        StatusCode::BAD_REQUEST => Err(SourceError::SheetNotFound {
            sheet: sheet.to_string(),
        }),
        status => Err(SourceError::Transport {
            sheet: sheet.to_string(),
            message: format!("HTTP {}", status),
        }),
    }
}

/// Sheet names with spaces or quotes must be quoted in A1 notation.
fn quote_sheet_name(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

fn values_to_grid(values: Vec<Vec<serde_json::Value>>) -> RawGrid {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}
