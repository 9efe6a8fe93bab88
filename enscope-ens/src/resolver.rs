//! Combined ENS + indexer resolver producing enriched profiles.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use enscope_core::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_INDEXER_BASE_URL, DEFAULT_RESOLVER_BASE_URL,
    DEFAULT_TIMEOUT_SECONDS,
};
use enscope_core::error::{ProfileError, Result};
use enscope_core::types::{
    BatchFailure, BatchResolution, Enrichment, LookupStep, NameQuery, ResolvedProfile,
};
use enscope_indexer::{IndexerClient, IndexerConfig};

use crate::ens::{EnsConfig, EnsGatewayClient};

/// How enrichment sub-steps share failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentPolicy {
    /// Each lookup runs concurrently and fails on its own.
    #[default]
    Isolated,
    /// Balance, transaction count, and contract status run in order; the
    /// first one without a readable body abandons the rest. Token holdings
    /// run afterwards on their own.
    SharedBoundary,
}

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Name-resolution gateway base URL
    pub resolver_base_url: String,
    /// Indexer base URL
    pub indexer_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Failure coupling between enrichment lookups
    pub enrichment_policy: EnrichmentPolicy,
    /// Names resolved at once by [`NameResolver::resolve_batch`]
    pub batch_concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resolver_base_url: DEFAULT_RESOLVER_BASE_URL.into(),
            indexer_base_url: DEFAULT_INDEXER_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            enrichment_policy: EnrichmentPolicy::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl ResolverConfig {
    /// Overrides the name-resolution gateway.
    pub fn with_resolver_url(mut self, url: impl Into<String>) -> Self {
        self.resolver_base_url = url.into();
        self
    }

    /// Overrides the indexer.
    pub fn with_indexer_url(mut self, url: impl Into<String>) -> Self {
        self.indexer_base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the enrichment failure policy.
    pub fn with_policy(mut self, policy: EnrichmentPolicy) -> Self {
        self.enrichment_policy = policy;
        self
    }

    /// Sets batch concurrency.
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency;
        self
    }

    /// Checks URLs and limits.
    pub fn validate(&self) -> Result<()> {
        for (label, url) in [
            ("resolver", &self.resolver_base_url),
            ("indexer", &self.indexer_base_url),
        ] {
            Url::parse(url)
                .map_err(|e| ProfileError::ConfigError(format!("Invalid {} URL '{}': {}", label, url, e)))?;
        }

        if self.timeout_seconds == 0 {
            return Err(ProfileError::ConfigError("timeout_seconds must be positive".into()));
        }

        if self.batch_concurrency == 0 {
            return Err(ProfileError::ConfigError("batch_concurrency must be positive".into()));
        }

        Ok(())
    }

    fn ens_config(&self) -> EnsConfig {
        EnsConfig::new(&self.resolver_base_url).with_timeout(self.timeout_seconds)
    }

    fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig::new(&self.indexer_base_url).with_timeout(self.timeout_seconds)
    }
}

/// Resolver that combines the ENS gateway and the indexer.
///
/// Resolves names to profiles by:
/// 1. Validating the name (no request on failure)
/// 2. Looking up the address (the only mandatory request)
/// 3. Fetching text records, best effort
/// 4. Enriching the address from the indexer when a credential is given, best effort
pub struct NameResolver {
    ens: EnsGatewayClient,
    indexer: IndexerClient,
    config: ResolverConfig,
}

impl NameResolver {
    /// Creates a resolver against the default hosts.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        config.validate()?;

        let ens = EnsGatewayClient::with_config(config.ens_config())?;
        let indexer = IndexerClient::with_config(config.indexer_config())?;

        Ok(Self {
            ens,
            indexer,
            config,
        })
    }

    /// Returns the resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves an ENS name to a profile.
    ///
    /// Fails only with [`ProfileError::InvalidFormat`] or [`ProfileError::NotFound`].
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let resolver = NameResolver::new()?;
    /// let profile = resolver.resolve("vitalik.eth", std::env::var("SIM_API_KEY").ok().as_deref()).await?;
    /// ```
    #[instrument(skip(self, credential))]
    pub async fn resolve(&self, name: &str, credential: Option<&str>) -> Result<ResolvedProfile> {
        let query = NameQuery::new(name, credential)?;
        self.resolve_query(&query).await
    }

    /// Resolves an already validated query.
    #[instrument(skip(self))]
    pub async fn resolve_query(&self, query: &NameQuery) -> Result<ResolvedProfile> {
        let name = query.name();
        let address = self.lookup_address(name).await?;

        debug!(name, address = %address, "Resolved address");

        let records_lookup = self.ens.text_records(name);
        let enrichment_lookup = async {
            match query.credential() {
                Some(api_key) => Some(self.enrich(&address, api_key).await),
                None => None,
            }
        };
        let (records, enrichment) = futures::join!(records_lookup, enrichment_lookup);

        let mut degraded = Vec::new();
        let records: BTreeMap<String, String> = settle(LookupStep::TextRecords, records, &mut degraded);
        let enrichment = enrichment.map(|(enrichment, failed)| {
            degraded.extend(failed);
            enrichment
        });

        let profile = ResolvedProfile {
            name: query.input().to_string(),
            address,
            records,
            enrichment,
            degraded,
        };

        info!(
            name,
            records = profile.records.len(),
            enriched = profile.enrichment.is_some(),
            degraded = profile.degraded.len(),
            "Resolved profile"
        );

        Ok(profile)
    }

    /// Resolves a list of names, keeping input order.
    ///
    /// Blank entries are skipped. A failure for one name never fails the batch.
    pub async fn resolve_batch<S: AsRef<str>>(
        &self,
        names: &[S],
        credential: Option<&str>,
    ) -> BatchResolution {
        self.resolve_batch_with_progress(names, credential, |_, _| {}).await
    }

    /// Like [`resolve_batch`](Self::resolve_batch), calling `progress` with each
    /// name and whether it resolved, in input order.
    #[instrument(skip_all, fields(count = names.len()))]
    pub async fn resolve_batch_with_progress<S, F>(
        &self,
        names: &[S],
        credential: Option<&str>,
        mut progress: F,
    ) -> BatchResolution
    where
        S: AsRef<str>,
        F: FnMut(&str, bool),
    {
        let names: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect();

        let outcomes = stream::iter(names)
            .map(|name| async move {
                let outcome = self.resolve(&name, credential).await;
                (name, outcome)
            })
            .buffered(self.config.batch_concurrency);
        futures::pin_mut!(outcomes);

        let mut batch = BatchResolution::default();
        while let Some((name, outcome)) = outcomes.next().await {
            progress(&name, outcome.is_ok());

            match outcome {
                Ok(profile) => batch.resolved.push(profile),
                Err(e) => {
                    debug!(name = %name, error = %e, "Batch entry failed");
                    batch.failed.push(BatchFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            resolved = batch.resolved.len(),
            failed = batch.failed.len(),
            "Batch resolution complete"
        );

        batch
    }

    /// The mandatory step. Every failure here becomes `NotFound`.
    async fn lookup_address(&self, name: &str) -> Result<String> {
        match self.ens.resolve_address(name).await {
            Ok(Some(address)) => Ok(address),
            Ok(None) => Err(ProfileError::NotFound(name.to_string())),
            Err(e) => {
                warn!(name, error = %e, "Address lookup failed");
                Err(ProfileError::NotFound(name.to_string()))
            }
        }
    }

    async fn enrich(&self, address: &str, api_key: &str) -> (Enrichment, Vec<LookupStep>) {
        match self.config.enrichment_policy {
            EnrichmentPolicy::Isolated => self.enrich_isolated(address, api_key).await,
            EnrichmentPolicy::SharedBoundary => self.enrich_shared(address, api_key).await,
        }
    }

    async fn enrich_isolated(&self, address: &str, api_key: &str) -> (Enrichment, Vec<LookupStep>) {
        let (balance, tx_count, is_contract, holdings) = futures::join!(
            self.indexer.balance(address, api_key),
            self.indexer.transaction_count(address, api_key),
            self.indexer.is_contract(address, api_key),
            self.indexer.token_holdings(address, api_key),
        );

        let mut degraded = Vec::new();
        let enrichment = Enrichment {
            balance: settle(LookupStep::Balance, balance, &mut degraded),
            tx_count: settle(LookupStep::TransactionCount, tx_count, &mut degraded),
            is_contract: settle(LookupStep::ContractStatus, is_contract, &mut degraded),
            token_holdings: settle(LookupStep::TokenHoldings, holdings, &mut degraded),
        };

        (enrichment, degraded)
    }

    async fn enrich_shared(&self, address: &str, api_key: &str) -> (Enrichment, Vec<LookupStep>) {
        let (mut enrichment, mut degraded) = self.enrich_chain(address, api_key).await;

        let holdings = self.indexer.token_holdings(address, api_key).await;
        enrichment.token_holdings = settle(LookupStep::TokenHoldings, holdings, &mut degraded);

        (enrichment, degraded)
    }

    /// Runs [`SHARED_CHAIN`] in order. A readable error body only costs its
    /// own field; an unreadable one ends the chain.
    async fn enrich_chain(&self, address: &str, api_key: &str) -> (Enrichment, Vec<LookupStep>) {
        let mut enrichment = Enrichment::default();
        let mut degraded = Vec::new();

        match self.indexer.balance(address, api_key).await {
            Err(e) if e.is_unreadable() => {
                return abandon(LookupStep::Balance, e, enrichment, degraded)
            }
            outcome => enrichment.balance = settle(LookupStep::Balance, outcome, &mut degraded),
        }

        match self.indexer.transaction_count(address, api_key).await {
            Err(e) if e.is_unreadable() => {
                return abandon(LookupStep::TransactionCount, e, enrichment, degraded)
            }
            outcome => {
                enrichment.tx_count = settle(LookupStep::TransactionCount, outcome, &mut degraded)
            }
        }

        match self.indexer.is_contract(address, api_key).await {
            Err(e) if e.is_unreadable() => {
                return abandon(LookupStep::ContractStatus, e, enrichment, degraded)
            }
            outcome => {
                enrichment.is_contract = settle(LookupStep::ContractStatus, outcome, &mut degraded)
            }
        }

        (enrichment, degraded)
    }
}

/// Indexer lookups sharing one failure boundary under
/// [`EnrichmentPolicy::SharedBoundary`], in issue order.
const SHARED_CHAIN: [LookupStep; 3] = [
    LookupStep::Balance,
    LookupStep::TransactionCount,
    LookupStep::ContractStatus,
];

/// Maps a best-effort step to its value, or its default on failure.
fn settle<T: Default>(step: LookupStep, outcome: Result<T>, degraded: &mut Vec<LookupStep>) -> T {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!(step = %step, error = %e, "Lookup step degraded");
            degraded.push(step);
            T::default()
        }
    }
}

/// Marks `failed` and every later chained step as degraded.
fn abandon(
    failed: LookupStep,
    error: ProfileError,
    enrichment: Enrichment,
    mut degraded: Vec<LookupStep>,
) -> (Enrichment, Vec<LookupStep>) {
    warn!(step = %failed, error = %error, "Enrichment abandoned");

    degraded.extend(SHARED_CHAIN.iter().skip_while(|step| **step != failed).copied());

    (enrichment, degraded)
}
