use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::core::{
    allocation::{Allocation, AllocationOptimizer, StudentPreferences},
    filters::{candidates, check_student, is_eligible, validate_internships, validate_students},
    ranking::{rank, MatchOptions},
    scoring::ScoringEngine,
};
use crate::error::MatchError;
use crate::models::{Internship, MatchResult, RejectedRecord, ScoringWeights, Student};

/// Aggregate result of a batch matching run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<MatchResult>,
    pub rejected: Vec<RejectedRecord>,
    pub total_students_processed: usize,
    pub total_matches_generated: usize,
    pub processing_time_seconds: f64,
}

/// Result of an allocation run together with the records that were skipped
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub allocation: Allocation,
    pub rejected: Vec<RejectedRecord>,
    /// Accepted students only; rejected records are reported separately
    pub total_students: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Record validation (missing or duplicate identifiers are rejected)
/// 2. Candidate generation (active internships with open slots)
/// 3. Scoring, in parallel across students
/// 4. Ranking and truncation per student
/// 5. Optional capacity-bounded allocation across all students
#[derive(Debug, Clone)]
pub struct Matcher {
    engine: ScoringEngine,
    optimizer: AllocationOptimizer,
}

impl Matcher {
    pub fn new(engine: ScoringEngine, optimizer: AllocationOptimizer) -> Self {
        Self { engine, optimizer }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringEngine::new(ScoringWeights::default()), AllocationOptimizer::default())
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score and rank every candidate internship for one student
    pub fn match_student(
        &self,
        student: &Student,
        internships: &[&Internship],
        options: &MatchOptions,
    ) -> MatchResult {
        let options = options.clamped();

        let scores = candidates(student, internships)
            .into_iter()
            .map(|internship| self.engine.score_with(student, internship, options.diversity_boost))
            .collect();

        let matches: Vec<_> =
            rank(scores, options.min_score_threshold, options.max_matches_per_student).collect();

        tracing::debug!("Student {}: {} matches found", student.student_id, matches.len());

        MatchResult {
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            total_matches: matches.len(),
            matches,
        }
    }

    /// Match many students independently
    ///
    /// Students are scored on the rayon pool; results keep input order.
    pub fn batch_match(
        &self,
        students: &[Student],
        internships: &[Internship],
        options: &MatchOptions,
    ) -> BatchOutcome {
        let started = Instant::now();

        let (students, mut rejected) = validate_students(students);
        let (internships, rejected_internships) = validate_internships(internships);
        rejected.extend(rejected_internships);

        tracing::info!(
            "Processing batch match for {} students and {} internships",
            students.len(),
            internships.len()
        );

        let results: Vec<MatchResult> = students
            .par_iter()
            .map(|student| self.match_student(student, &internships, options))
            .collect();

        let total_matches_generated: usize = results.iter().map(|r| r.total_matches).sum();
        let processing_time_seconds = started.elapsed().as_secs_f64();

        tracing::info!(
            "Batch matching completed in {:.3}s. Generated {} matches ({} records rejected)",
            processing_time_seconds,
            total_matches_generated,
            rejected.len()
        );

        BatchOutcome {
            total_students_processed: results.len(),
            results,
            rejected,
            total_matches_generated,
            processing_time_seconds,
        }
    }

    /// Match a single student with no score threshold
    pub fn single_match(
        &self,
        student: &Student,
        internships: &[Internship],
        max_matches: usize,
    ) -> Result<MatchResult, MatchError> {
        check_student(0, student)?;

        let (internships, rejected) = validate_internships(internships);
        if !rejected.is_empty() {
            tracing::debug!("Skipped {} malformed internships", rejected.len());
        }

        let options = MatchOptions {
            diversity_boost: true,
            max_matches_per_student: max_matches,
            min_score_threshold: 0.0,
        };

        Ok(self.match_student(student, &internships, &options))
    }

    /// Resolve a capacity-respecting assignment of students to internships
    pub fn optimize_allocation(
        &self,
        students: &[Student],
        internships: &[Internship],
        diversity_boost: bool,
    ) -> AllocationOutcome {
        let (students, mut rejected) = validate_students(students);
        let (internships, rejected_internships) = validate_internships(internships);
        rejected.extend(rejected_internships);

        tracing::info!("Optimizing allocation for {} students", students.len());

        // Immutable capacity snapshot for this run
        let capacities: BTreeMap<String, u32> = internships
            .iter()
            .filter(|internship| is_eligible(internship))
            .map(|internship| (internship.internship_id.clone(), internship.remaining_capacity()))
            .collect();

        let preferences: Vec<StudentPreferences> = students
            .par_iter()
            .map(|student| {
                let scores = candidates(student, &internships)
                    .into_iter()
                    .map(|internship| self.engine.score_with(student, internship, diversity_boost))
                    .collect();

                StudentPreferences {
                    student_id: student.student_id.clone(),
                    ranked: rank(scores, 0.0, usize::MAX).collect(),
                }
            })
            .collect();

        let allocation =
            self.optimizer
                .allocate(&preferences, &capacities, self.engine.weights(), diversity_boost);

        AllocationOutcome {
            allocation,
            rejected,
            total_students: students.len(),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
