//! # ENScope Core
//!
//! Core types, errors, and constants for resolving ENS names into enriched profiles.
//!
//! This crate provides the foundational building blocks used by all other ENScope crates:
//!
//! - **Types**: [`NameQuery`] input, [`ResolvedProfile`] output, [`Enrichment`] data
//! - **Errors**: A single [`ProfileError`] enum with classification helpers
//! - **Constants**: Default service hosts, chain id, header names
//!
//! ## Example
//!
//! ```rust
//! use enscope_core::{NameQuery, ProfileError};
//!
//! let query = NameQuery::new("vitalik.eth", None).unwrap();
//! assert_eq!(query.name(), "vitalik.eth");
//! assert!(!query.has_credential());
//!
//! let err = NameQuery::new("not-a-name", None).unwrap_err();
//! assert!(matches!(err, ProfileError::InvalidFormat(_)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ProfileError, Result};
pub use types::*;
