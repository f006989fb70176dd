//! Web platform checkers
//!
//! Unauthenticated probes against the mapping platform's item endpoint and
//! the open-data portal. Each checker owns its own client for the one
//! request it makes.

use crate::checks::CheckOutcome;
use crate::error::ConductorResult;

fn build_client(follow_redirects: bool) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent("conductor/1.0")
        .timeout(std::time::Duration::from_secs(30));

    if !follow_redirects {
        builder = builder.redirect(reqwest::redirect::Policy::none());
    }

    builder.build().expect("reqwest client should build")
}

/// Checks whether the web mapping platform knows the item id
pub struct WebItemChecker {
    http: reqwest::Client,
    url: String,
}

impl WebItemChecker {
    pub fn new(base_url: &str, item_id: &str) -> Self {
        Self {
            http: build_client(true),
            url: format!("{}/{}", base_url.trim_end_matches('/'), item_id),
        }
    }

    /// A valid item document carries an `owner` field; error documents
    /// come back 200 without one.
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let payload: serde_json::Value = self
            .http
            .get(&self.url)
            .query(&[("f", "json")])
            .send()
            .await?
            .json()
            .await?;

        Ok(CheckOutcome::Exists(payload.get("owner").is_some()))
    }
}

/// Checks whether the open-data portal serves a page for the dataset
pub struct OpenDataChecker {
    http: reqwest::Client,
    url: String,
}

impl OpenDataChecker {
    pub fn new(base_url: &str, item_name: &str) -> Self {
        Self {
            http: build_client(false),
            url: format!("{}/{}", base_url.trim_end_matches('/'), kebab_case(item_name)),
        }
    }

    /// Redirects are not followed; only a direct 200 counts as existing
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let resp = self.http.get(&self.url).send().await?;

        Ok(CheckOutcome::Exists(
            resp.status() == reqwest::StatusCode::OK,
        ))
    }
}

/// Portal slug for a published display name
pub fn kebab_case(value: &str) -> String {
    value.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_cases_display_names() {
        assert_eq!(kebab_case("Utah County Boundaries"), "utah-county-boundaries");
        assert_eq!(kebab_case("Counties"), "counties");
    }

    #[test]
    fn item_url_joins_cleanly() {
        let checker = WebItemChecker::new(
            "https://www.arcgis.com/sharing/rest/content/items/",
            "abc123",
        );
        assert_eq!(
            checker.url,
            "https://www.arcgis.com/sharing/rest/content/items/abc123"
        );
    }

    #[test]
    fn open_data_url_uses_slug() {
        let checker =
            OpenDataChecker::new("https://opendata.gis.utah.gov/datasets", "Utah Counties");
        assert_eq!(
            checker.url,
            "https://opendata.gis.utah.gov/datasets/utah-counties"
        );
    }
}
