//! ENS gateway client for resolving addresses and text records.
//!
//! Queries an HTTP name-resolution gateway exposing
//! `/resolve-name/{name}` and `/resolve-text/{name}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use enscope_core::constants::{DEFAULT_RESOLVER_BASE_URL, DEFAULT_TIMEOUT_SECONDS, ZERO_ADDRESS};
use enscope_core::error::{ProfileError, Result};

/// ENS gateway configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnsConfig {
    /// Gateway base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RESOLVER_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl EnsConfig {
    /// Creates a new configuration with the given gateway URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Client for the name-resolution gateway.
pub struct EnsGatewayClient {
    config: EnsConfig,
    http_client: reqwest::Client,
}

impl EnsGatewayClient {
    /// Creates a new gateway client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(EnsConfig::new(base_url))
    }

    /// Creates a new gateway client with custom configuration.
    pub fn with_config(config: EnsConfig) -> Result<Self> {
        Url::parse(&config.base_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProfileError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &EnsConfig {
        &self.config
    }

    /// Resolves a name to its address.
    ///
    /// # Returns
    ///
    /// The address, or None if the gateway answered without a usable one
    /// (missing, empty, or the zero address).
    #[instrument(skip(self))]
    pub async fn resolve_address(&self, name: &str) -> Result<Option<String>> {
        let body = self.get_json("resolve-name", name).await?;

        let address = body
            .get("address")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case(ZERO_ADDRESS))
            .map(String::from);

        debug!(name, found = address.is_some(), "Address lookup complete");
        Ok(address)
    }

    /// Fetches all text records of a name.
    ///
    /// A body without a `records` object yields an empty map; non-string
    /// values are dropped.
    #[instrument(skip(self))]
    pub async fn text_records(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let body = self.get_json("resolve-text", name).await?;

        let records: BTreeMap<String, String> = body
            .get("records")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        debug!(name, count = records.len(), "Text records lookup complete");
        Ok(records)
    }

    /// Builds `{base}/{route}/{name}`.
    pub(crate) fn route_url(&self, route: &str, name: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}/{}", base, route, name))?)
    }

    async fn get_json(&self, route: &str, name: &str) -> Result<Value> {
        let url = self.route_url(route, name)?;

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProfileError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProfileError::MalformedResponse(format!("{}: {}", route, e)))
    }
}
