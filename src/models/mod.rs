// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DistrictType, Internship, MatchExplanation, MatchResult, MatchScore, QualificationLevel,
    RecordKind, RejectedRecord, ScoringWeights, SocialCategory, Student,
};
pub use requests::{
    AnalyticsRequest, BatchMatchRequest, OptimizeAllocationRequest, SingleMatchRequest,
};
pub use responses::{
    AllocationResponse, BatchMatchResponse, ErrorResponse, HealthResponse, ReadinessResponse,
};
