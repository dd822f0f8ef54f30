use std::fmt;
use std::sync::Arc;

use canonical::CanonicalName;
use catalog::Product;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Confidence bucket of a match. Declaration order is result order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Normalized disease (and plant, when queried) names are identical.
    Exact,
    /// Combined score at or above `strong_cutoff`.
    Strong,
    /// Combined score at or above `fuzzy_cutoff`.
    Fuzzy,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Exact => "EXACT",
            Tier::Strong => "STRONG",
            Tier::Fuzzy => "FUZZY",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching policy.
///
/// Weights are relative: the combined score is the weighted mean of the
/// disease and plant scores, so `0.6/0.4` and `3/2` rank identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    #[serde(default = "MatchConfig::default_disease_weight")]
    pub disease_weight: f64,
    #[serde(default = "MatchConfig::default_plant_weight")]
    pub plant_weight: f64,
    /// Minimum combined score for [`Tier::Strong`].
    #[serde(default = "MatchConfig::default_strong_cutoff")]
    pub strong_cutoff: f64,
    /// Minimum combined score for [`Tier::Fuzzy`]; anything below is dropped.
    #[serde(default = "MatchConfig::default_fuzzy_cutoff")]
    pub fuzzy_cutoff: f64,
    /// Result limit (K).
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
    /// Without a plant query, score on the disease alone instead of counting
    /// the missing plant as 0.
    #[serde(default = "MatchConfig::default_renormalize")]
    pub renormalize_without_plant: bool,
}

impl MatchConfig {
    pub(crate) fn default_disease_weight() -> f64 {
        0.6
    }

    pub(crate) fn default_plant_weight() -> f64 {
        0.4
    }

    pub(crate) fn default_strong_cutoff() -> f64 {
        85.0
    }

    pub(crate) fn default_fuzzy_cutoff() -> f64 {
        65.0
    }

    pub(crate) fn default_max_results() -> usize {
        5
    }

    pub(crate) fn default_renormalize() -> bool {
        true
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_cutoffs(mut self, strong: f64, fuzzy: f64) -> Self {
        self.strong_cutoff = strong;
        self.fuzzy_cutoff = fuzzy;
        self
    }

    pub fn with_weights(mut self, disease: f64, plant: f64) -> Self {
        self.disease_weight = disease;
        self.plant_weight = plant;
        self
    }

    /// Combines component scores into one value on the same 0–100 scale.
    pub fn combine(&self, disease_score: f64, plant_score: Option<f64>) -> f64 {
        let total = self.disease_weight + self.plant_weight;
        match plant_score {
            Some(plant) => {
                (disease_score * self.disease_weight + plant * self.plant_weight) / total
            }
            None if self.renormalize_without_plant => disease_score,
            None => disease_score * self.disease_weight / total,
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, weight) in [
            ("disease_weight", self.disease_weight),
            ("plant_weight", self.plant_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if self.disease_weight + self.plant_weight <= 0.0 {
            return Err(MatchError::InvalidConfig(
                "disease_weight and plant_weight must not both be zero".into(),
            ));
        }
        for (name, cutoff) in [
            ("strong_cutoff", self.strong_cutoff),
            ("fuzzy_cutoff", self.fuzzy_cutoff),
        ] {
            if !(0.0..=100.0).contains(&cutoff) {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0 and 100"
                )));
            }
        }
        if self.fuzzy_cutoff > self.strong_cutoff {
            return Err(MatchError::InvalidConfig(
                "fuzzy_cutoff must not exceed strong_cutoff".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            disease_weight: Self::default_disease_weight(),
            plant_weight: Self::default_plant_weight(),
            strong_cutoff: Self::default_strong_cutoff(),
            fuzzy_cutoff: Self::default_fuzzy_cutoff(),
            max_results: Self::default_max_results(),
            renormalize_without_plant: Self::default_renormalize(),
        }
    }
}

/// A lookup for products treating one disease, optionally on one plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductQuery {
    pub disease_scientific_name: String,
    #[serde(default)]
    pub plant_scientific_name: Option<String>,
}

impl ProductQuery {
    pub fn new(disease: impl Into<String>) -> Self {
        Self {
            disease_scientific_name: disease.into(),
            plant_scientific_name: None,
        }
    }

    pub fn with_plant(mut self, plant: impl Into<String>) -> Self {
        self.plant_scientific_name = Some(plant.into());
        self
    }
}

/// A [`ProductQuery`] with both names normalized and tokenized.
///
/// A plant name that normalizes to nothing is dropped, so `Some("  ")` and
/// `None` behave the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    pub disease: CanonicalName,
    pub plant: Option<CanonicalName>,
}

impl PreparedQuery {
    pub fn new(query: &ProductQuery) -> Self {
        let disease = CanonicalName::new(&query.disease_scientific_name);
        let plant = query
            .plant_scientific_name
            .as_deref()
            .map(CanonicalName::new)
            .filter(|name| !name.is_empty());
        Self { disease, plant }
    }

    /// True when neither name carries anything to match on.
    pub fn is_empty(&self) -> bool {
        self.disease.is_empty() && self.plant.is_none()
    }
}

impl From<&ProductQuery> for PreparedQuery {
    fn from(query: &ProductQuery) -> Self {
        Self::new(query)
    }
}

/// One ranked product.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductMatch {
    pub product: Arc<Product>,
    /// Combined score in `[0, 100]`; 100 for [`Tier::Exact`].
    pub score: f64,
    pub tier: Tier,
    pub disease_score: f64,
    /// `None` when the query named no plant.
    pub plant_score: Option<f64>,
}

/// Errors produced by the matching layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    /// No products are published.
    #[error("catalog is empty")]
    EmptyCatalog,
    /// The catalog was searched but nothing cleared the fuzzy cutoff.
    #[error("no product matched the query")]
    NoMatch,
    /// Neither a disease nor a plant name was supplied.
    #[error("query must name a disease or a plant")]
    InvalidQuery,
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
