// Core algorithm exports
pub mod allocation;
pub mod analytics;
pub mod filters;
pub mod matcher;
pub mod ranking;
pub mod scoring;
pub mod similarity;

pub use allocation::{Allocation, AllocationOptimizer, StudentPreferences};
pub use analytics::{summarize, AnalyticsReport};
pub use filters::{candidates, is_eligible, validate_internships, validate_students};
pub use matcher::{AllocationOutcome, BatchOutcome, Matcher};
pub use ranking::{rank, MatchOptions};
pub use scoring::ScoringEngine;
pub use similarity::{SkillEmbeddings, SkillSimilarity};
