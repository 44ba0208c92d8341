use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::matcher::{AllocationOutcome, BatchOutcome};
use crate::models::domain::{MatchResult, RejectedRecord};

/// Response for the batch match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatchResponse {
    pub results: Vec<MatchResult>,
    pub rejected: Vec<RejectedRecord>,
    pub total_students_processed: usize,
    pub total_matches_generated: usize,
    pub processing_time_seconds: f64,
}

impl From<BatchOutcome> for BatchMatchResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            results: outcome.results,
            rejected: outcome.rejected,
            total_students_processed: outcome.total_students_processed,
            total_matches_generated: outcome.total_matches_generated,
            processing_time_seconds: (outcome.processing_time_seconds * 10_000.0).round()
                / 10_000.0,
        }
    }
}

/// Response for the allocation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResponse {
    pub allocation_id: uuid::Uuid,
    pub allocation: BTreeMap<String, String>,
    pub unassigned: Vec<String>,
    pub rejected: Vec<RejectedRecord>,
    pub total_allocated: usize,
    pub total_students: usize,
    pub allocation_rate: f64,
}

impl From<AllocationOutcome> for AllocationResponse {
    fn from(outcome: AllocationOutcome) -> Self {
        let total_allocated = outcome.allocation.total_allocated();
        let allocation_rate = outcome.allocation.allocation_rate(outcome.total_students);

        Self {
            allocation_id: uuid::Uuid::new_v4(),
            allocation: outcome.allocation.assignments,
            unassigned: outcome.allocation.unassigned,
            rejected: outcome.rejected,
            total_allocated,
            total_students: outcome.total_students,
            allocation_rate,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: String,
    pub skill_embeddings_loaded: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
