//! Batch resolution output.

use serde::{Deserialize, Serialize};

use super::ResolvedProfile;

/// A name that could not be resolved in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The name as given
    pub name: String,
    /// Human-readable reason
    pub error: String,
}

/// Outcome of resolving a list of names.
///
/// Both lists keep the input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResolution {
    /// Successfully resolved profiles
    pub resolved: Vec<ResolvedProfile>,
    /// Names that failed validation or resolution
    pub failed: Vec<BatchFailure>,
}

impl BatchResolution {
    /// Total number of names attempted.
    pub fn len(&self) -> usize {
        self.resolved.len() + self.failed.len()
    }

    /// Returns true if no names were attempted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name to address pairs for the resolved entries.
    pub fn addresses(&self) -> Vec<(&str, &str)> {
        self.resolved
            .iter()
            .map(|p| (p.name.as_str(), p.address.as_str()))
            .collect()
    }
}
