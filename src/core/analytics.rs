use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::MatchResult;

/// Diversity explanations that carry no factor worth counting
const NEUTRAL_DIVERSITY_LABELS: [&str; 2] = ["No diversity factors", "Diversity boost disabled"];

/// Summary statistics over a set of match results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_students: usize,
    pub total_internships: usize,
    pub avg_matches_per_student: f64,
    pub avg_match_score: f64,
    pub diversity_distribution: BTreeMap<String, usize>,
    pub sector_distribution: BTreeMap<String, usize>,
    pub location_distribution: BTreeMap<String, usize>,
}

/// Aggregate match results into counts and averages
pub fn summarize(results: &[MatchResult]) -> AnalyticsReport {
    if results.is_empty() {
        return AnalyticsReport::default();
    }

    let mut internships = BTreeSet::new();
    let mut score_sum = 0.0;
    let mut match_count = 0usize;
    let mut report = AnalyticsReport {
        total_students: results.len(),
        ..AnalyticsReport::default()
    };

    for m in results.iter().flat_map(|r| r.matches.iter()) {
        internships.insert(m.internship_id.as_str());
        score_sum += m.overall_score;
        match_count += 1;

        let diversity = m.explanation.diversity.as_str();
        if !diversity.is_empty() && !NEUTRAL_DIVERSITY_LABELS.contains(&diversity) {
            for factor in diversity.split(", ") {
                *report.diversity_distribution.entry(factor.to_string()).or_default() += 1;
            }
        }

        if !m.explanation.sector.is_empty() {
            *report.sector_distribution.entry(m.explanation.sector.clone()).or_default() += 1;
        }
        if !m.explanation.location.is_empty() {
            *report.location_distribution.entry(m.explanation.location.clone()).or_default() += 1;
        }
    }

    report.total_internships = internships.len();
    report.avg_matches_per_student = round_to(match_count as f64 / results.len() as f64, 2);
    report.avg_match_score = if match_count > 0 {
        round_to(score_sum / match_count as f64, 4)
    } else {
        0.0
    };

    report
}

#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchExplanation, MatchScore};

    const SC_FIRST_TIMER: &str = "Social category: SC, First-time applicant";

    fn match_score(internship: &str, overall: f64, diversity: &str, sector: &str) -> MatchScore {
        MatchScore {
            student_id: "S1".to_string(),
            internship_id: internship.to_string(),
            overall_score: overall,
            skill_score: overall,
            qualification_score: overall,
            location_score: overall,
            sector_score: overall,
            diversity_score: 0.5,
            explanation: MatchExplanation {
                skills: String::new(),
                qualification: String::new(),
                location: "Exact location match".to_string(),
                sector: sector.to_string(),
                diversity: diversity.to_string(),
            },
        }
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(summarize(&[]), AnalyticsReport::default());
    }

    #[test]
    fn test_summarize_counts() {
        let results = vec![
            MatchResult {
                student_id: "S1".to_string(),
                student_name: "A".to_string(),
                matches: vec![
                    match_score("I1", 0.8, SC_FIRST_TIMER, "Exact sector match"),
                    match_score("I2", 0.6, SC_FIRST_TIMER, "No sector match"),
                ],
                total_matches: 2,
            },
            MatchResult {
                student_id: "S2".to_string(),
                student_name: "B".to_string(),
                matches: vec![match_score("I1", 0.7, "No diversity factors", "Exact sector match")],
                total_matches: 1,
            },
            MatchResult {
                student_id: "S3".to_string(),
                student_name: "C".to_string(),
                matches: vec![],
                total_matches: 0,
            },
        ];

        let report = summarize(&results);

        assert_eq!(report.total_students, 3);
        assert_eq!(report.total_internships, 2);
        assert_eq!(report.avg_matches_per_student, 1.0);
        assert_eq!(report.avg_match_score, 0.7);
        assert_eq!(report.diversity_distribution.get("Social category: SC"), Some(&2));
        assert_eq!(report.diversity_distribution.get("First-time applicant"), Some(&2));
        assert!(!report.diversity_distribution.contains_key("No diversity factors"));
        assert_eq!(report.sector_distribution.get("Exact sector match"), Some(&2));
        assert_eq!(report.location_distribution.get("Exact location match"), Some(&3));
    }
}
