use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::token::tokenize_normalized;

/// A name prepared for comparison: the normalized text plus its token set.
///
/// Catalog snapshots build one of these per product field when they are
/// published, queries build one per request. Token order is irrelevant for
/// scoring, so tokens are kept as a sorted set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalName {
    text: String,
    tokens: BTreeSet<String>,
}

impl CanonicalName {
    pub fn new(raw: &str) -> Self {
        Self::from_normalized(normalize(raw))
    }

    /// Builds from text that is already normalized.
    pub fn from_normalized(text: String) -> Self {
        let tokens = tokenize_normalized(&text)
            .into_iter()
            .map(|t| t.text)
            .collect();
        Self { text, tokens }
    }

    pub fn from_opt(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
