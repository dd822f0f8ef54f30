use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogCache, CatalogEntry, CatalogSnapshot};

use crate::memo::{MemoKey, QueryMemo};
use crate::metrics::{metrics_recorder, MatchOutcome};
use crate::similarity::{score_names, MAX_SCORE};
use crate::types::{MatchConfig, MatchError, PreparedQuery, ProductMatch, ProductQuery, Tier};


/// Ranks every product of `snapshot` against `query`.
///
/// Results are ordered by tier (EXACT, STRONG, FUZZY), then by combined
/// score descending, then by catalog insertion order, and truncated to
/// `config.max_results`. Products below `fuzzy_cutoff` are dropped, so the
/// result may be empty. Pure: the same inputs always give the same output.
pub fn rank(
    snapshot: &CatalogSnapshot,
    query: &PreparedQuery,
    config: &MatchConfig,
) -> Vec<ProductMatch> {
    let mut ranked: Vec<(usize, ProductMatch)> = snapshot
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| classify(entry, query, config).map(|m| (position, m)))
        .collect();

    ranked.sort_by(|(pos_a, a), (pos_b, b)| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| pos_a.cmp(pos_b))
    });
    ranked.truncate(config.max_results);
    ranked.into_iter().map(|(_, m)| m).collect()
}

fn classify(entry: &CatalogEntry, query: &PreparedQuery, config: &MatchConfig) -> Option<ProductMatch> {
    let disease_score = score_names(&query.disease, &entry.disease);
    let plant_score = query
        .plant
        .as_ref()
        .map(|plant| score_names(plant, &entry.plant));
    let combined = config.combine(disease_score, plant_score);

    let exact = !query.disease.is_empty()
        && query.disease.as_str() == entry.disease.as_str()
        && query
            .plant
            .as_ref()
            .is_none_or(|plant| plant.as_str() == entry.plant.as_str());

    let (tier, score) = if exact {
        (Tier::Exact, MAX_SCORE)
    } else if combined >= config.strong_cutoff {
        (Tier::Strong, combined)
    } else if combined >= config.fuzzy_cutoff {
        (Tier::Fuzzy, combined)
    } else {
        return None;
    };

    Some(ProductMatch {
        product: Arc::clone(&entry.product),
        score,
        tier,
        disease_score,
        plant_score,
    })
}

/// Query front end over a [`CatalogCache`].
///
/// Each search pins the snapshot that is current when it starts and ranks
/// against that snapshot only, so a concurrent reload is either fully
/// visible to a search or not at all.
#[derive(Debug)]
pub struct Matcher {
    catalog: Arc<CatalogCache>,
    config: MatchConfig,
    memo: Option<QueryMemo>,
}

impl Matcher {
    /// Construct a matcher over a shared catalog. The configuration is
    /// validated once here.
    pub fn new(catalog: Arc<CatalogCache>, config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            memo: None,
        })
    }

    /// Enables the query memo with room for `capacity` results; 0 disables it.
    pub fn with_memo(mut self, capacity: usize) -> Self {
        self.memo = QueryMemo::with_capacity(capacity);
        self
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn memo(&self) -> Option<&QueryMemo> {
        self.memo.as_ref()
    }

    /// Ranked matches for `query` against the current snapshot.
    ///
    /// Errors, checked in this order: [`MatchError::EmptyCatalog`] when
    /// nothing is published, [`MatchError::InvalidQuery`] when neither name
    /// survives normalization, [`MatchError::NoMatch`] when no product
    /// clears the fuzzy cutoff.
    pub fn search(&self, query: &ProductQuery) -> Result<Vec<ProductMatch>, MatchError> {
        let start = Instant::now();
        let result = self.search_inner(query);

        let (outcome, hits) = match &result {
            Ok(matches) => (MatchOutcome::Matched, matches.len()),
            Err(MatchError::NoMatch) => (MatchOutcome::NoMatch, 0),
            Err(MatchError::EmptyCatalog) => (MatchOutcome::EmptyCatalog, 0),
            Err(MatchError::InvalidQuery) | Err(MatchError::InvalidConfig(_)) => {
                (MatchOutcome::InvalidQuery, 0)
            }
        };
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(outcome, start.elapsed(), hits);
        }
        result
    }

    fn search_inner(&self, query: &ProductQuery) -> Result<Vec<ProductMatch>, MatchError> {
        let snapshot = self.catalog.current();
        if snapshot.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }

        let prepared = PreparedQuery::new(query);
        if prepared.is_empty() {
            return Err(MatchError::InvalidQuery);
        }

        let matches = self.ranked(&snapshot, &prepared);
        if matches.is_empty() {
            return Err(MatchError::NoMatch);
        }
        Ok(matches.as_ref().clone())
    }

    fn ranked(&self, snapshot: &CatalogSnapshot, prepared: &PreparedQuery) -> Arc<Vec<ProductMatch>> {
        let Some(memo) = &self.memo else {
            return Arc::new(self.rank_logged(snapshot, prepared));
        };

        let key = MemoKey::new(prepared, snapshot.generation());
        let cached = memo.get(&key);
        if let Some(recorder) = metrics_recorder() {
            recorder.record_memo(cached.is_some());
        }
        if let Some(matches) = cached {
            return matches;
        }

        let matches = Arc::new(self.rank_logged(snapshot, prepared));
        memo.insert(key, Arc::clone(&matches));
        matches
    }

    fn rank_logged(&self, snapshot: &CatalogSnapshot, prepared: &PreparedQuery) -> Vec<ProductMatch> {
        let matches = rank(snapshot, prepared, &self.config);
        let count = |tier| matches.iter().filter(|m| m.tier == tier).count();
        tracing::debug!(
            generation = snapshot.generation(),
            disease = %prepared.disease,
            plant = prepared.plant.as_ref().map(|p| p.as_str()),
            candidates = snapshot.len(),
            exact = count(Tier::Exact),
            strong = count(Tier::Strong),
            fuzzy = count(Tier::Fuzzy),
            "ranked catalog"
        );
        matches
    }
}
