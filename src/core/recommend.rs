use std::cmp::Ordering;

use crate::core::scoring::calculate_match_score;
use crate::core::semester::period_distance;
use crate::models::{CandidateKind, MatchProfile, Scorable, Scored, ScoringWeights, Thresholds};

/// Partitioned ranking of one candidate collection
#[derive(Debug, Clone)]
pub struct Partitioned<T> {
    /// Candidates the profile already holds a membership or connection to
    pub mine: Vec<Scored<T>>,
    /// Non-members at or above the kind threshold, falling back to the
    /// single best non-member when none qualify
    pub recommended: Vec<Scored<T>>,
    /// Every non-member, regardless of threshold
    pub others: Vec<Scored<T>>,
    pub total_candidates: usize,
}

/// Recommendation engine - scores a candidate collection against a profile
/// and partitions it for display.
///
/// # Pipeline stages
/// 1. Score every candidate (pure, per-pair)
/// 2. Partition by membership (identity, not score)
/// 3. Threshold the non-members into `recommended`, with top-1 fallback
/// 4. Sort by score, tie-breaking on period proximity
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
    thresholds: Thresholds,
    score_cap: u8,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, thresholds: Thresholds, score_cap: u8) -> Self {
        Self {
            weights,
            thresholds,
            score_cap,
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            // Legacy rule: never display a perfect match
            score_cap: 98,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn threshold_for(&self, kind: CandidateKind) -> u8 {
        self.thresholds.for_kind(kind)
    }

    /// Score one candidate against a profile, applying the display cap
    pub fn score<T: Scorable>(&self, profile: &MatchProfile, item: T) -> Scored<T> {
        let (raw, shared_tags) = calculate_match_score(&item, profile, &self.weights);
        let period_distance =
            period_distance(item.academic_period(), profile.academic_period.as_deref());

        Scored {
            item,
            match_score: raw.min(self.score_cap),
            shared_tags,
            period_distance,
        }
    }

    /// Rank a candidate collection for a profile.
    ///
    /// `is_mine` decides membership by identity (joined group, enrolled
    /// module, accepted connection) - never by score. Empty input yields
    /// three empty partitions; any non-member at all guarantees a
    /// non-empty `recommended`.
    pub fn partition<T, F>(
        &self,
        profile: &MatchProfile,
        candidates: Vec<T>,
        kind: CandidateKind,
        is_mine: F,
    ) -> Partitioned<T>
    where
        T: Scorable + Clone,
        F: Fn(&T) -> bool,
    {
        let total_candidates = candidates.len();
        let threshold = self.thresholds.for_kind(kind);

        let mut mine = Vec::new();
        let mut others = Vec::new();

        for candidate in candidates {
            let member = is_mine(&candidate);
            let scored = self.score(profile, candidate);
            if member {
                mine.push(scored);
            } else {
                others.push(scored);
            }
        }

        sort_by_score(&mut mine);
        sort_by_score(&mut others);

        let mut recommended: Vec<Scored<T>> = others
            .iter()
            .filter(|s| s.match_score >= threshold)
            .cloned()
            .collect();

        // Never show an empty recommendation shelf while candidates exist
        if recommended.is_empty() {
            if let Some(best) = others.first() {
                recommended.push(best.clone());
            }
        }

        Partitioned {
            mine,
            recommended,
            others,
            total_candidates,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Sort by score (descending), then by period proximity (ascending).
///
/// Candidates without a period distance sort after those with one; for
/// kinds that carry no period at all the secondary key is inert and the
/// stable sort preserves input order among ties.
fn sort_by_score<T>(list: &mut [Scored<T>]) {
    list.sort_by(|a, b| {
        b.match_score.cmp(&a.match_score).then_with(|| {
            let da = a.period_distance.unwrap_or(f64::INFINITY);
            let db = b.period_distance.unwrap_or(f64::INFINITY);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        })
    });
}
