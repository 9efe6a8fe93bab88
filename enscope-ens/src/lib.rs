//! # ENScope ENS Integration
//!
//! Resolves ENS names to enriched profiles.
//! Uses enscope-indexer for on-chain metadata.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ens;
mod resolver;

pub use ens::{EnsConfig, EnsGatewayClient};
pub use enscope_indexer::{IndexerClient, IndexerConfig};
pub use resolver::{EnrichmentPolicy, NameResolver, ResolverConfig};
