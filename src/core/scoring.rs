use crate::core::semester::period_distance;
use crate::models::{MatchProfile, Scorable, ScoringWeights};

/// Points per shared club membership in the affiliation term
const CLUB_POINTS: f64 = 15.0;
/// Points per shared module enrollment in the affiliation term
const MODULE_POINTS: f64 = 10.0;

/// Calculate a match score (0-100) for a candidate against a profile
///
/// Scoring formula (default weights):
/// ```text
/// score = interest_term     # 40: fraction of candidate tags matched
///       + period_term       # 20: academic-period proximity, both known
///       + affiliation_term  # 30: shared clubs and modules, capped
///       + base_term         # 10: flat boost when any tag matched
/// ```
///
/// Each term is clamped on its own before summing; the total is rounded
/// and clamped to [0, 100]. The function is total: empty tag or interest
/// lists produce the floor score, never an error. Holding everything else
/// fixed, the score never decreases when tag matches or shared
/// affiliations increase.
pub fn calculate_match_score<C>(
    candidate: &C,
    profile: &MatchProfile,
    weights: &ScoringWeights,
) -> (u8, Vec<String>)
where
    C: Scorable + ?Sized,
{
    let tags = candidate.tags();

    // Tag comparison is case-sensitive exact match
    let shared_tags: Vec<String> = tags
        .iter()
        .filter(|tag| profile.interests.contains(tag))
        .cloned()
        .collect();

    let interest_term =
        (shared_tags.len() as f64 / tags.len().max(1) as f64) * weights.interest;

    let period_term = period_term(
        candidate.academic_period(),
        profile.academic_period.as_deref(),
        weights.period,
    );

    let overlap = candidate.affiliation_overlap(profile);
    let affiliation_term = (overlap.clubs as f64 * CLUB_POINTS
        + overlap.modules as f64 * MODULE_POINTS)
        .min(weights.affiliation);

    let base_term = if shared_tags.is_empty() {
        0.0
    } else {
        weights.base
    };

    let total = interest_term + period_term + affiliation_term + base_term;

    (total.round().clamp(0.0, 100.0) as u8, shared_tags)
}

/// Period proximity term: full weight for the same term, stepping down to
/// zero beyond two years. Zero when either period is unknown.
#[inline]
fn period_term(candidate: Option<&str>, profile: Option<&str>, weight: f64) -> f64 {
    // Distances are exact multiples of 0.5, so equality comparison is safe
    match period_distance(candidate, profile) {
        Some(d) if d == 0.0 => weight,
        Some(d) if d == 0.5 => weight * 0.75,
        Some(d) if d == 1.0 => weight * 0.5,
        Some(d) if d <= 2.0 => weight * 0.25,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;

    fn student(interests: &[&str], period: Option<&str>) -> Student {
        Student {
            id: 1,
            name: "Test Student".to_string(),
            major: "Informatik".to_string(),
            academic_period: period.map(String::from),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            bio: None,
            courses: vec![],
            club_ids: vec![],
        }
    }

    fn profile(interests: &[&str], period: Option<&str>) -> MatchProfile {
        MatchProfile {
            user_id: 99,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            academic_period: period.map(String::from),
            club_ids: vec![],
            courses: vec![],
        }
    }

    #[test]
    fn test_interest_and_base_terms() {
        // 2 of 3 tags match: (2/3)*40 + 10 base = 36.67 -> 37
        let candidate = student(&["KI", "Coding", "Lernen"], None);
        let me = profile(&["KI", "Coding", "AI", "Gaming"], None);

        let (score, shared) =
            calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 37);
        assert_eq!(shared, vec!["KI", "Coding"]);
    }

    #[test]
    fn test_same_period_full_term() {
        let candidate = student(&[], Some("WiSe 24/25"));
        let me = profile(&[], Some("WiSe 24/25"));

        let (score, _) = calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 20);
    }

    #[test]
    fn test_adjacent_period_term() {
        let candidate = student(&[], Some("SoSe 24"));
        let me = profile(&[], Some("WiSe 24/25"));

        let (score, _) = calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 15);
    }

    #[test]
    fn test_unknown_period_no_term() {
        let candidate = student(&[], Some("irgendwann"));
        let me = profile(&[], Some("SoSe 25"));

        let (score, _) = calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 0);
    }

    #[test]
    fn test_affiliation_term_capped() {
        let mut candidate = student(&[], None);
        candidate.club_ids = vec![1, 2, 3];
        candidate.courses = vec!["Mathe 1".to_string()];

        let mut me = profile(&[], None);
        me.club_ids = vec![1, 2, 3];
        me.courses = vec!["Mathe 1".to_string()];

        // 3 clubs * 15 + 1 module * 10 = 55, capped at 30
        let (score, _) = calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 30);
    }

    #[test]
    fn test_empty_inputs_floor() {
        let candidate = student(&[], None);
        let me = profile(&[], None);

        let (score, shared) =
            calculate_match_score(&candidate, &me, &ScoringWeights::default());

        assert_eq!(score, 0);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_score_monotone_in_matches() {
        let me = profile(&["KI", "Coding", "Gaming"], None);

        let one = student(&["KI", "Sport", "Musik"], None);
        let two = student(&["KI", "Coding", "Musik"], None);

        let (score_one, _) = calculate_match_score(&one, &me, &ScoringWeights::default());
        let (score_two, _) = calculate_match_score(&two, &me, &ScoringWeights::default());

        assert!(score_two >= score_one);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let mut candidate = student(&["KI"], Some("SoSe 25"));
        candidate.club_ids = vec![1, 2];

        let mut me = profile(&["KI"], Some("SoSe 25"));
        me.club_ids = vec![1, 2];

        let weights = ScoringWeights {
            interest: 80.0,
            period: 40.0,
            affiliation: 30.0,
            base: 20.0,
        };

        let (score, _) = calculate_match_score(&candidate, &me, &weights);

        assert_eq!(score, 100);
    }

    #[test]
    fn test_period_term_symmetric() {
        let a = student(&[], Some("SoSe 23"));
        let me_a = profile(&[], Some("WiSe 24/25"));

        let b = student(&[], Some("WiSe 24/25"));
        let me_b = profile(&[], Some("SoSe 23"));

        let (score_ab, _) = calculate_match_score(&a, &me_a, &ScoringWeights::default());
        let (score_ba, _) = calculate_match_score(&b, &me_b, &ScoringWeights::default());

        assert_eq!(score_ab, score_ba);
    }
}
