use std::cmp::Ordering;

use crate::models::MatchScore;

pub const DEFAULT_MAX_MATCHES: usize = 10;
pub const MAX_MATCHES_LIMIT: usize = 50;
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Caller-supplied knobs for a matching run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    pub diversity_boost: bool,
    pub max_matches_per_student: usize,
    pub min_score_threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            diversity_boost: true,
            max_matches_per_student: DEFAULT_MAX_MATCHES,
            min_score_threshold: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatchOptions {
    /// Force the limit into [1, 50] and the threshold into [0, 1]
    pub fn clamped(self) -> Self {
        let min_score_threshold = if self.min_score_threshold.is_nan() {
            DEFAULT_MIN_SCORE
        } else {
            self.min_score_threshold.clamp(0.0, 1.0)
        };

        Self {
            diversity_boost: self.diversity_boost,
            max_matches_per_student: self.max_matches_per_student.clamp(1, MAX_MATCHES_LIMIT),
            min_score_threshold,
        }
    }
}

/// Ranking order: overall score descending, then internship id ascending
#[inline]
pub fn compare_scores(a: &MatchScore, b: &MatchScore) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| a.internship_id.cmp(&b.internship_id))
}

/// Filter, order and truncate one student's scored candidates
///
/// The returned iterator is single-use; calling `rank` again on the same
/// scores yields the same sequence.
pub fn rank(
    scores: Vec<MatchScore>,
    min_score: f64,
    limit: usize,
) -> impl Iterator<Item = MatchScore> {
    let mut kept: Vec<MatchScore> = scores
        .into_iter()
        .filter(|score| score.overall_score >= min_score)
        .collect();

    kept.sort_by(compare_scores);
    kept.into_iter().take(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchExplanation;

    fn score(internship_id: &str, overall: f64) -> MatchScore {
        MatchScore {
            student_id: "S1".to_string(),
            internship_id: internship_id.to_string(),
            overall_score: overall,
            skill_score: overall,
            qualification_score: overall,
            location_score: overall,
            sector_score: overall,
            diversity_score: overall,
            explanation: MatchExplanation::default(),
        }
    }

    #[test]
    fn test_rank_sorts_and_breaks_ties_by_id() {
        let scores = vec![score("I3", 0.7), score("I1", 0.9), score("I2", 0.7)];

        let ranked: Vec<String> = rank(scores, 0.0, 10).map(|s| s.internship_id).collect();

        assert_eq!(ranked, vec!["I1", "I2", "I3"]);
    }

    #[test]
    fn test_rank_applies_threshold() {
        let scores = vec![score("I1", 0.49), score("I2", 0.5), score("I3", 0.8)];

        let ranked: Vec<MatchScore> = rank(scores, 0.5, 10).collect();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.overall_score >= 0.5));
    }

    #[test]
    fn test_rank_respects_limit() {
        let scores: Vec<MatchScore> = (0..20).map(|i| score(&format!("I{:02}", i), 0.6)).collect();

        let ranked: Vec<MatchScore> = rank(scores, 0.0, 5).collect();

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].internship_id, "I00");
    }

    #[test]
    fn test_rank_is_repeatable() {
        let scores = vec![score("B", 0.6), score("A", 0.6), score("C", 0.9)];

        let first: Vec<MatchScore> = rank(scores.clone(), 0.5, 10).collect();
        let second: Vec<MatchScore> = rank(scores, 0.5, 10).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_options_clamped() {
        let options = MatchOptions {
            diversity_boost: false,
            max_matches_per_student: 500,
            min_score_threshold: 1.5,
        }
        .clamped();
        assert_eq!(options.max_matches_per_student, MAX_MATCHES_LIMIT);
        assert_eq!(options.min_score_threshold, 1.0);

        let zero = MatchOptions { max_matches_per_student: 0, ..MatchOptions::default() }.clamped();
        assert_eq!(zero.max_matches_per_student, 1);
    }
}
