//! Domain types for ENScope.
//!
//! - [`NameQuery`]: Validated name plus optional indexer credential
//! - [`ResolvedProfile`]: Address, text records, and enrichment for one name
//! - [`Enrichment`]: Fixed-shape on-chain metadata
//! - [`TokenHolding`]: One token balance of an address
//! - [`LookupStep`]: Best-effort steps that may degrade
//! - [`BatchResolution`]: Outcome of resolving a list of names

mod query;
mod profile;
mod batch;

pub use query::*;
pub use profile::*;
pub use batch::*;
