use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ranking::{MatchOptions, DEFAULT_MAX_MATCHES, DEFAULT_MIN_SCORE};
use crate::models::domain::{Internship, MatchResult, Student};

fn default_true() -> bool { true }

fn default_max_matches() -> u16 {
    DEFAULT_MAX_MATCHES as u16
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

/// Request to match many students at once
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatchRequest {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub internships: Vec<Internship>,
    #[serde(alias = "diversity_boost", default = "default_true")]
    pub diversity_boost: bool,
    #[validate(range(min = 1, max = 50))]
    #[serde(alias = "max_matches_per_student", default = "default_max_matches")]
    pub max_matches_per_student: u16,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(alias = "min_score_threshold", default = "default_min_score")]
    pub min_score_threshold: f64,
}

impl BatchMatchRequest {
    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            diversity_boost: self.diversity_boost,
            max_matches_per_student: self.max_matches_per_student as usize,
            min_score_threshold: self.min_score_threshold,
        }
    }
}

/// Request to match one student
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SingleMatchRequest {
    pub student: Student,
    #[serde(default)]
    pub internships: Vec<Internship>,
    #[validate(range(min = 1, max = 50))]
    #[serde(alias = "max_matches", default = "default_max_matches")]
    pub max_matches: u16,
}

/// Request to resolve a capacity-bounded allocation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeAllocationRequest {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub internships: Vec<Internship>,
    #[serde(alias = "diversity_boost", default = "default_true")]
    pub diversity_boost: bool,
}

/// Request to summarize previously produced match results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    #[serde(alias = "match_results", default)]
    pub match_results: Vec<MatchResult>,
}
