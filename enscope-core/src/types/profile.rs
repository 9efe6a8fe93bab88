//! Resolution output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::WELL_KNOWN_RECORDS;

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP STEPS
// ═══════════════════════════════════════════════════════════════════════════════

/// A best-effort lookup that may fail without failing the resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStep {
    /// Text records from the name resolver.
    TextRecords,
    /// Native balance from the indexer.
    Balance,
    /// Transaction count from the indexer.
    TransactionCount,
    /// Contract flag from the indexer.
    ContractStatus,
    /// Token balances from the indexer.
    TokenHoldings,
}

impl LookupStep {
    /// Enrichment steps in issue order.
    pub const ENRICHMENT: [LookupStep; 4] = [
        LookupStep::Balance,
        LookupStep::TransactionCount,
        LookupStep::ContractStatus,
        LookupStep::TokenHoldings,
    ];

    /// Short identifier used in logs and API output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStep::TextRecords => "text_records",
            LookupStep::Balance => "balance",
            LookupStep::TransactionCount => "transaction_count",
            LookupStep::ContractStatus => "contract_status",
            LookupStep::TokenHoldings => "token_holdings",
        }
    }

    /// Returns true for the indexer-backed steps.
    pub fn is_enrichment(&self) -> bool {
        !matches!(self, LookupStep::TextRecords)
    }
}

impl fmt::Display for LookupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENRICHMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A token balance held by an address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    /// Ticker, e.g. "USDC"
    pub symbol: String,
    /// Token name
    pub name: String,
    /// Raw amount in the token's smallest unit
    pub amount: String,
    /// Decimal places of `amount`, when reported
    pub decimals: Option<u32>,
    /// Value of the holding in USD
    pub value_usd: Option<f64>,
    /// Unit price in USD
    pub price_usd: Option<f64>,
}

impl TokenHolding {
    /// Amount in whole tokens.
    ///
    /// Unknown or zero decimals leave the raw amount as is. None if the
    /// amount is not numeric.
    pub fn scaled_amount(&self) -> Option<f64> {
        let raw: f64 = self.amount.trim().parse().ok()?;
        match self.decimals {
            Some(decimals) if decimals > 0 => Some(raw / 10f64.powi(decimals as i32)),
            _ => Some(raw),
        }
    }
}

/// On-chain metadata for a resolved address.
///
/// Every field has a default so a failed lookup simply leaves it unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    /// Native currency balance as a decimal string (wei)
    pub balance: Option<String>,
    /// Number of transactions sent or received
    pub tx_count: Option<u64>,
    /// Whether the address holds contract code
    #[serde(default)]
    pub is_contract: bool,
    /// Non-spam token balances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_holdings: Vec<TokenHolding>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROFILE
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregated result of resolving one ENS name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProfile {
    /// The name as given by the caller
    pub name: String,
    /// Resolved address
    pub address: String,
    /// Text records keyed by record name (may be empty)
    #[serde(default)]
    pub records: BTreeMap<String, String>,
    /// On-chain metadata, absent when no indexer credential was supplied
    pub enrichment: Option<Enrichment>,
    /// Best-effort steps that failed and fell back to defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<LookupStep>,
}

impl ResolvedProfile {
    /// Creates a profile with no records, no enrichment, and nothing degraded.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            records: BTreeMap::new(),
            enrichment: None,
            degraded: Vec::new(),
        }
    }

    /// Returns true if `step` failed during resolution.
    pub fn is_degraded(&self, step: LookupStep) -> bool {
        self.degraded.contains(&step)
    }

    /// Returns true if any best-effort step failed.
    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Looks up a text record.
    pub fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    /// Present well-known profile records with their display labels.
    ///
    /// Empty values are skipped. For fields with several possible keys the
    /// first non-empty one wins.
    pub fn well_known_records(&self) -> Vec<(&'static str, &str)> {
        WELL_KNOWN_RECORDS
            .iter()
            .filter_map(|(keys, label)| {
                keys.iter()
                    .filter_map(|k| self.record(k))
                    .find(|v| !v.is_empty())
                    .map(|v| (*label, v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serialization_shape() {
        let mut profile = ResolvedProfile::new("vitalik.eth", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        profile.enrichment = Some(Enrichment {
            balance: Some("1000".into()),
            tx_count: Some(42),
            is_contract: false,
            token_holdings: Vec::new(),
        });

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "vitalik.eth");
        assert_eq!(json["enrichment"]["txCount"], 42);
        assert_eq!(json["enrichment"]["isContract"], false);
        assert!(json["enrichment"].get("tokenHoldings").is_none());
        assert!(json.get("degraded").is_none());
    }

    #[test]
    fn test_profile_without_enrichment_serializes_null() {
        let profile = ResolvedProfile::new("nick.eth", "0xabc");
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["enrichment"].is_null());
        assert_eq!(json["records"], serde_json::json!({}));
    }

    #[test]
    fn test_degraded_steps() {
        let mut profile = ResolvedProfile::new("nick.eth", "0xabc");
        assert!(!profile.is_partial());

        profile.degraded.push(LookupStep::Balance);
        assert!(profile.is_degraded(LookupStep::Balance));
        assert!(!profile.is_degraded(LookupStep::TextRecords));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["degraded"], serde_json::json!(["balance"]));
    }

    #[test]
    fn test_well_known_records_order_and_aliases() {
        let mut profile = ResolvedProfile::new("vitalik.eth", "0xabc");
        profile.records.insert("com.twitter".into(), "VitalikButerin".into());
        profile.records.insert("avatar".into(), "https://example.com/a.png".into());
        profile.records.insert("github".into(), "vbuterin".into());
        profile.records.insert("url".into(), String::new());
        profile.records.insert("custom".into(), "ignored".into());

        assert_eq!(
            profile.well_known_records(),
            vec![
                ("Avatar", "https://example.com/a.png"),
                ("Twitter", "VitalikButerin"),
                ("GitHub", "vbuterin"),
            ]
        );
    }

    #[test]
    fn test_lookup_step_classification() {
        assert!(!LookupStep::TextRecords.is_enrichment());
        assert!(LookupStep::ENRICHMENT.iter().all(LookupStep::is_enrichment));
        assert_eq!(LookupStep::TransactionCount.to_string(), "transaction_count");
        assert_eq!(LookupStep::TokenHoldings.to_string(), "token_holdings");
    }

    #[test]
    fn test_token_holding_scaled_amount() {
        let usdc = TokenHolding {
            symbol: "USDC".into(),
            amount: "2500000".into(),
            decimals: Some(6),
            ..Default::default()
        };
        assert_eq!(usdc.scaled_amount(), Some(2.5));

        let raw = TokenHolding {
            amount: "12".into(),
            decimals: Some(0),
            ..Default::default()
        };
        assert_eq!(raw.scaled_amount(), Some(12.0));

        let junk = TokenHolding {
            amount: "lots".into(),
            ..Default::default()
        };
        assert_eq!(junk.scaled_amount(), None);
    }
}
