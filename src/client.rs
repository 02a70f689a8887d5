//! Market-data API collaborator boundary
//!
//! The completion subsystem consumes the remote data API only through the
//! [`DataApi`] trait. [`HttpDataApi`] is the production implementation;
//! tests substitute their own. Every call here is a cold-cache path: during
//! normal completion the catalogs are served from memory or from the
//! on-disk cache files.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Request timeout for catalog fetches. A slow API must not wedge the
/// shell for longer than this on a cold cache.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
    },
}

/// An active company listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub ticker: String,
    pub name: String,
    /// Whether the company has a peer group (enables `TICKER.peers` completion).
    #[serde(default)]
    pub peers: Option<String>,
}

/// Metadata describing one metric, as served by the metrics endpoint.
///
/// `kind` drives which period catalog applies to the metric; `data_format`
/// selects the screening operator set; `screening_conditions` is a
/// comma-separated list of valid bound values for screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricMetadata {
    pub metric_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data_format: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub period_type_default: Option<String>,
    #[serde(default)]
    pub screening_conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningProfile {
    pub profile_name: String,
    pub display_name: String,
}

/// A user watchlist: a named set of tickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub name: String,
    pub tickers: Vec<String>,
}

/// The narrow contract the completion subsystem has with the data API.
pub trait DataApi {
    fn active_companies(&self) -> Result<Vec<Company>, ApiError>;
    fn metrics_metadata(&self) -> Result<Vec<MetricMetadata>, ApiError>;
    fn screening_profiles(&self) -> Result<Vec<ScreeningProfile>, ApiError>;
    fn user_watchlists(&self) -> Result<Vec<Watchlist>, ApiError>;
}

/// Blocking HTTP implementation of [`DataApi`].
pub struct HttpDataApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpDataApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
                endpoint: url,
            });
        }
        Ok(response.json()?)
    }
}

impl DataApi for HttpDataApi {
    fn active_companies(&self) -> Result<Vec<Company>, ApiError> {
        self.get_json("stockinfo/companies/active")
    }

    fn metrics_metadata(&self) -> Result<Vec<MetricMetadata>, ApiError> {
        self.get_json("metrics/metadata?page_size=1000")
    }

    fn screening_profiles(&self) -> Result<Vec<ScreeningProfile>, ApiError> {
        self.get_json("screener/profiles")
    }

    fn user_watchlists(&self) -> Result<Vec<Watchlist>, ApiError> {
        self.get_json("user/watchlists")
    }
}
