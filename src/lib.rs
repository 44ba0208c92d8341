//! Internship Match - scoring and allocation engine for internship matching
//!
//! This library scores students against internships across five dimensions
//! (skills, qualification, location, sector, diversity), ranks the results
//! per student and resolves capacity-bounded allocations with deferred
//! acceptance.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{Allocation, AllocationOptimizer, MatchOptions, Matcher, ScoringEngine};
pub use error::MatchError;
pub use models::{Internship, MatchResult, MatchScore, ScoringWeights, Student};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let matcher = Matcher::default();
        assert_eq!(matcher.engine().weights(), &ScoringWeights::default());
        assert_eq!(MatchOptions::default().max_matches_per_student, 10);
    }
}
