//! Stewardship spreadsheet collaborator
//!
//! Narrow contract over the shared spreadsheet: fetch one worksheet as a
//! grid of trimmed-as-found cell values. Authorization happens outside the
//! pipeline; the client only carries a pre-acquired bearer token.

use serde::Deserialize;

use crate::config::SheetConfig;
use crate::error::{ConductorError, ConductorResult};

/// A worksheet grid; row 0 is the header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell value, empty string when the row is ragged short
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Capability contract for the spreadsheet collaborator
#[allow(async_fn_in_trait)]
pub trait WorksheetSource {
    async fn fetch(&self) -> ConductorResult<Worksheet>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets values-API implementation of [`WorksheetSource`]
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetConfig,
    base_url: String,
}

impl SheetsClient {
    pub fn new(config: &SheetConfig) -> Self {
        Self::with_base_url(config, "https://sheets.googleapis.com")
    }

    /// Point the client at a different API root (test servers)
    pub fn with_base_url(config: &SheetConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("conductor/1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            config: config.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn values_url(&self) -> ConductorResult<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| ConductorError::Config(format!("invalid sheets url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ConductorError::Config("sheets url cannot be a base".to_string()))?
            .extend([
                "v4",
                "spreadsheets",
                self.config.sheet_id.as_str(),
                "values",
                self.config.worksheet.as_str(),
            ]);

        Ok(url)
    }
}

impl WorksheetSource for SheetsClient {
    async fn fetch(&self) -> ConductorResult<Worksheet> {
        if self.config.token.is_empty() || self.config.sheet_id.is_empty() {
            return Err(ConductorError::MissingConfiguration("stewardship sheet"));
        }

        let resp = self
            .http
            .get(self.values_url()?)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ConductorError::Sheet(format!(
                "values request failed with status {}",
                resp.status().as_u16()
            )));
        }

        let range: ValueRange = resp.json().await?;

        Ok(Worksheet { rows: range.values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Worksheet {
        Worksheet {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn header_is_first_row() {
        let sheet = grid(&[&["SGID Data Layer", "Description"], &["a.b", "words"]]);
        assert_eq!(sheet.header(), &["SGID Data Layer", "Description"]);
    }

    #[test]
    fn ragged_rows_read_as_empty_cells() {
        let sheet = grid(&[&["SGID Data Layer", "Description"], &["a.b"]]);
        assert_eq!(sheet.cell(1, 1), "");
        assert_eq!(sheet.cell(5, 0), "");
    }

    #[test]
    fn values_url_encodes_worksheet_title() {
        let client = SheetsClient::with_base_url(
            &SheetConfig {
                token: "t".to_string(),
                sheet_id: "abc".to_string(),
                worksheet: "SGID Stewardship Info".to_string(),
            },
            "https://sheets.googleapis.com",
        );

        let url = client.values_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/SGID%20Stewardship%20Info"
        );
    }
}
