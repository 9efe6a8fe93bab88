//! App state: resolver and config.

use std::fmt;
use std::time::Instant;

use enscope_core::constants::{DEFAULT_INDEXER_BASE_URL, DEFAULT_RESOLVER_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use enscope_core::error::Result;
use enscope_ens::{NameResolver, ResolverConfig};

/// Server configuration.
#[derive(Clone, Default)]
pub struct ApiConfig {
    /// Resolver settings (hosts, timeout, policy)
    pub resolver: ResolverConfig,
    /// Indexer API key; enrichment is disabled without it
    pub sim_api_key: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("resolver", &self.resolver)
            .field("sim_api_key", &self.sim_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let resolver = ResolverConfig::default()
            .with_resolver_url(
                std::env::var("ENS_RESOLVER_URL").unwrap_or_else(|_| DEFAULT_RESOLVER_BASE_URL.into()),
            )
            .with_indexer_url(
                std::env::var("SIM_API_URL").unwrap_or_else(|_| DEFAULT_INDEXER_BASE_URL.into()),
            )
            .with_timeout(
                std::env::var("REQUEST_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            );

        Self {
            resolver,
            sim_api_key: std::env::var("SIM_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        }
    }
}

/// Shared state behind every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Profile resolver
    pub resolver: NameResolver,
    /// When the server state was built; health uptime counts from here
    pub started_at: Instant,
}

impl AppState {
    /// Builds the resolver from `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let resolver = NameResolver::with_config(config.resolver.clone())?;

        Ok(Self {
            config,
            resolver,
            started_at: Instant::now(),
        })
    }

    /// The credential forwarded to the resolver.
    pub fn credential(&self) -> Option<&str> {
        self.config.sim_api_key.as_deref()
    }
}
