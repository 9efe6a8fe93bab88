//! Resolution input.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::constants::ENS_NAME_PATTERN;
use crate::error::{ProfileError, Result};

static ENS_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(ENS_NAME_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("ENS name pattern must compile")
});

/// Checks an ENS name and returns it trimmed.
///
/// The name must be zero or more dot-terminated labels of letters, digits and
/// hyphens followed by `eth`. Case is not significant and is preserved.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if ENS_NAME_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(ProfileError::InvalidFormat(name.to_string()))
    }
}

/// Splits a comma-separated list of names, dropping blank entries.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A validated resolution request.
///
/// Built once per call and never mutated. An empty credential is treated as
/// absent, which disables enrichment.
#[derive(Clone, PartialEq, Eq)]
pub struct NameQuery {
    input: String,
    name: String,
    credential: Option<String>,
}

impl NameQuery {
    /// Validates `name` and captures the optional indexer API key.
    pub fn new(name: &str, credential: Option<&str>) -> Result<Self> {
        let validated = validate_name(name)?;
        let credential = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        Ok(Self {
            input: name.to_string(),
            name: validated.to_string(),
            credential,
        })
    }

    /// The name as given by the caller.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The trimmed name used for lookups.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The indexer API key, if any.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Returns true if enrichment should be attempted.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameQuery")
            .field("name", &self.name)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
