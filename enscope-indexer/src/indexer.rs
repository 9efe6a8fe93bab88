//! Indexer client implementation.
//!
//! Every lookup is a single authenticated GET. Response bodies are keyed by
//! address; a missing key is a legitimate "no data" answer and maps to the
//! field default, while transport, status, and body-shape problems are errors.
//!
//! Bodies are parsed before the status is checked, so an error status with a
//! JSON body reports [`ProfileError::UnexpectedStatus`] and one with an
//! unparseable body reports [`ProfileError::JsonError`].

use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use enscope_core::constants::{
    DEFAULT_INDEXER_BASE_URL, DEFAULT_TIMEOUT_SECONDS, ENRICHMENT_CHAIN_ID, INDEXER_API_KEY_HEADER,
};
use enscope_core::error::{ProfileError, Result};
use enscope_core::types::TokenHolding;

/// Indexer client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct IndexerConfig {
    /// Base URL, e.g. "https://api.sim.dune.com/v1/evm"
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INDEXER_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl IndexerConfig {
    /// Creates config for the given base URL.
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

/// Client for balance, transaction, token-info, and token-holding lookups.
pub struct IndexerClient {
    config: IndexerConfig,
    http_client: reqwest::Client,
}

impl IndexerClient {
    /// Creates a new indexer client with the given config.
    pub fn with_config(config: IndexerConfig) -> Result<Self> {
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
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Native currency balance of `address` as a decimal string.
    #[instrument(skip(self, api_key))]
    pub async fn balance(&self, address: &str, api_key: &str) -> Result<Option<String>> {
        let body = self.fetch("balances", address, &[], api_key).await?;
        Ok(extract_balance(&body, address))
    }

    /// Number of transactions involving `address`.
    #[instrument(skip(self, api_key))]
    pub async fn transaction_count(&self, address: &str, api_key: &str) -> Result<Option<u64>> {
        let body = self
            .fetch("transactions", address, &[("limit", "1")], api_key)
            .await?;
        Ok(extract_transaction_count(&body, address))
    }

    /// Whether `address` is a contract. Defaults to false when unreported.
    #[instrument(skip(self, api_key))]
    pub async fn is_contract(&self, address: &str, api_key: &str) -> Result<bool> {
        let body = self.fetch("token-info", address, &[], api_key).await?;
        Ok(extract_is_contract(&body, address))
    }

    /// Non-spam token balances held by `address`, in the order reported.
    #[instrument(skip(self, api_key))]
    pub async fn token_holdings(&self, address: &str, api_key: &str) -> Result<Vec<TokenHolding>> {
        let url = self.holdings_url(address)?;
        let body = self.get_json(url, "balances", api_key).await?;
        Ok(extract_token_holdings(&body))
    }

    /// Builds `{base}/{endpoint}?chain_ids=1&addresses={address}[&extra...]`.
    pub(crate) fn endpoint_url(
        &self,
        endpoint: &str,
        address: &str,
        extra: &[(&str, &str)],
    ) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, endpoint))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("chain_ids", &ENRICHMENT_CHAIN_ID.to_string());
            query.append_pair("addresses", address);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Builds `{base}/balances/{address}?chain_ids=1&exclude_spam_tokens=true`.
    pub(crate) fn holdings_url(&self, address: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/balances/{}", base, address))?;

        url.query_pairs_mut()
            .append_pair("chain_ids", &ENRICHMENT_CHAIN_ID.to_string())
            .append_pair("exclude_spam_tokens", "true");

        Ok(url)
    }

    async fn fetch(
        &self,
        endpoint: &str,
        address: &str,
        extra: &[(&str, &str)],
        api_key: &str,
    ) -> Result<Value> {
        let url = self.endpoint_url(endpoint, address, extra)?;
        let body = self.get_json(url, endpoint, api_key).await?;

        debug!(endpoint, address, "Indexer lookup complete");
        Ok(body)
    }

    async fn get_json(&self, url: Url, endpoint: &str, api_key: &str) -> Result<Value> {
        let response = self
            .http_client
            .get(url.clone())
            .header(INDEXER_API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| ProfileError::HttpError(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProfileError::HttpError(e.to_string()))?;
        let body: Value = serde_json::from_slice(&bytes)?;

        if !status.is_success() {
            return Err(ProfileError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if !body.is_object() {
            return Err(ProfileError::MalformedResponse(format!(
                "{}: expected a JSON object",
                endpoint
            )));
        }

        Ok(body)
    }
}

/// Finds the entry for `address` in an address-keyed object.
///
/// Exact key first, then a case-insensitive match since indexers often
/// lowercase addresses.
fn entry_for<'a>(map: Option<&'a Value>, address: &str) -> Option<&'a Value> {
    let map = map?.as_object()?;
    map.get(address).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(address))
            .map(|(_, value)| value)
    })
}

fn extract_balance(body: &Value, address: &str) -> Option<String> {
    let balance = entry_for(body.get("balances"), address)?
        .get("native")?
        .get("balance")?;

    match balance {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

// Zero is reported as absent, like a missing count.
fn extract_transaction_count(body: &Value, address: &str) -> Option<u64> {
    let count = entry_for(body.get("transactions"), address)?.get("count")?;

    let count = match count {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;

    (count > 0).then_some(count)
}

fn extract_is_contract(body: &Value, address: &str) -> bool {
    entry_for(body.get("token_info"), address)
        .and_then(|info| info.get("is_contract"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// Entries that aren't objects are skipped; a missing list means no holdings.
fn extract_token_holdings(body: &Value) -> Vec<TokenHolding> {
    let Some(entries) = body.get("balances").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| TokenHolding {
            symbol: text_field(entry, "symbol").unwrap_or_default(),
            name: text_field(entry, "name").unwrap_or_default(),
            amount: text_field(entry, "amount").unwrap_or_else(|| "0".into()),
            decimals: entry
                .get("decimals")
                .and_then(Value::as_u64)
                .and_then(|d| u32::try_from(d).ok()),
            value_usd: number_field(entry, "value_usd"),
            price_usd: number_field(entry, "price_usd"),
        })
        .collect()
}

/// A string field, or a number rendered as a string.
fn text_field(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(entry: &Value, key: &str) -> Option<f64> {
    match entry.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
