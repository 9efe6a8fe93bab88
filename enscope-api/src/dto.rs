//! DTOs for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use enscope_core::types::{parse_name_list, BatchResolution, ResolvedProfile};

/// Names accepted by the batch endpoint: a JSON array or one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    /// `["a.eth", "b.eth"]`
    List(Vec<String>),
    /// `"a.eth, b.eth"`
    Csv(String),
}

impl NameList {
    /// Flattens into individual non-blank names.
    pub fn into_names(self) -> Vec<String> {
        match self {
            NameList::List(names) => names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            NameList::Csv(csv) => parse_name_list(&csv),
        }
    }
}

/// Request to resolve several names.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Names to resolve
    pub names: NameList,
}

/// Response for a single profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The resolved profile
    #[serde(flatten)]
    pub profile: ResolvedProfile,
    /// When the profile was assembled
    pub resolved_at: DateTime<Utc>,
}

/// Response for a batch.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// Resolved and failed names
    #[serde(flatten)]
    pub batch: BatchResolution,
    /// Number of names attempted
    pub total: usize,
    /// When the batch finished
    pub resolved_at: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Whether an indexer key is configured
    pub enrichment_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_list_forms() {
        let req: BatchRequest = serde_json::from_str(r#"{"names": ["a.eth", " ", "b.eth "]}"#).unwrap();
        assert_eq!(req.names.into_names(), vec!["a.eth", "b.eth"]);

        let req: BatchRequest = serde_json::from_str(r#"{"names": "a.eth, b.eth"}"#).unwrap();
        assert_eq!(req.names.into_names(), vec!["a.eth", "b.eth"]);
    }
}
