//! On-chain indexer client for enriching resolved addresses.
//!
//! Talks to the Dune Sim EVM API: native balance, transaction count,
//! contract status, and token holdings of an address on a fixed chain.

mod indexer;

pub use indexer::{IndexerClient, IndexerConfig};
