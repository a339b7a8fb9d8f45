//! Remote samples over HTTP.
//!
//! A URL may serve either a CSV (header row + records) or a plain value list;
//! both are parsed with the same rules as local input.
//!
//! Environment (`.env` is honored):
//! - `DISTFIT_DATA_URL`: default URL when `--url` is given without a value
//! - `DISTFIT_HTTP_TIMEOUT_SECS`: request timeout (default 30)

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::AppError;
use crate::io::ingest::{IngestedValues, parse_document};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct RemoteSource {
    client: Client,
    default_url: Option<String>,
}

impl RemoteSource {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let timeout = match std::env::var("DISTFIT_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::new(2, format!("Invalid DISTFIT_HTTP_TIMEOUT_SECS '{raw}'."))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;

        let default_url = std::env::var("DISTFIT_DATA_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        Ok(Self {
            client,
            default_url,
        })
    }

    /// `url` if given, otherwise `DISTFIT_DATA_URL`.
    pub fn resolve_url<'a>(&'a self, url: Option<&'a str>) -> Result<&'a str, AppError> {
        url.filter(|u| !u.trim().is_empty())
            .or(self.default_url.as_deref())
            .ok_or_else(|| AppError::new(2, "No URL given and DISTFIT_DATA_URL is not set."))
    }

    /// Fetch `url` and extract its values (`column` selects a CSV column).
    pub fn fetch(&self, url: &str, column: Option<&str>) -> Result<IngestedValues, AppError> {
        debug!(url, "fetching remote sample");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Request to '{url}' failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Request to '{url}' failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read response from '{url}': {e}")))?;

        let data = parse_document(&body, column)?;
        info!(url, values = data.values.len(), "remote sample loaded");
        Ok(data)
    }
}
