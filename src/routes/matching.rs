use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    AllocationResponse, BatchMatchRequest, BatchMatchResponse, ErrorResponse,
    OptimizeAllocationRequest, SingleMatchRequest,
};
use crate::routes::AppState;

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/batch", web::post().to(batch_match))
        .route("/single", web::post().to(single_match))
        .route("/optimize", web::post().to(optimize_allocation));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn engine_unavailable(context: &str, err: actix_web::error::BlockingError) -> HttpResponse {
    tracing::error!("Error in {}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: format!("Error in {}", context),
        message: err.to_string(),
        status_code: 500,
    })
}

/// Batch match endpoint
///
/// POST /api/v1/matching/batch
///
/// Request body:
/// ```json
/// {
///   "students": [ ... ],
///   "internships": [ ... ],
///   "diversityBoost": true,
///   "maxMatchesPerStudent": 10,
///   "minScoreThreshold": 0.5
/// }
/// ```
async fn batch_match(
    state: web::Data<AppState>,
    req: web::Json<BatchMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch match request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let options = req.options();
    let matcher = state.matcher.clone();

    let outcome =
        web::block(move || matcher.batch_match(&req.students, &req.internships, &options)).await;

    match outcome {
        Ok(outcome) => HttpResponse::Ok().json(BatchMatchResponse::from(outcome)),
        Err(e) => engine_unavailable("batch matching", e),
    }
}

/// Single student match endpoint
///
/// POST /api/v1/matching/single
///
/// Request body:
/// ```json
/// {
///   "student": { ... },
///   "internships": [ ... ],
///   "maxMatches": 10
/// }
/// ```
async fn single_match(
    state: web::Data<AppState>,
    req: web::Json<SingleMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    tracing::info!("Processing single match for student {}", req.student.student_id);

    let matcher = state.matcher.clone();
    let outcome = web::block(move || {
        matcher.single_match(&req.student, &req.internships, req.max_matches as usize)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => HttpResponse::Ok().json(result),
        Ok(Err(e)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid student record".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        Err(e) => engine_unavailable("single matching", e),
    }
}

/// Allocation endpoint
///
/// POST /api/v1/matching/optimize
///
/// Request body:
/// ```json
/// {
///   "students": [ ... ],
///   "internships": [ ... ],
///   "diversityBoost": true
/// }
/// ```
async fn optimize_allocation(
    state: web::Data<AppState>,
    req: web::Json<OptimizeAllocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let matcher = state.matcher.clone();

    let outcome = web::block(move || {
        matcher.optimize_allocation(&req.students, &req.internships, req.diversity_boost)
    })
    .await;

    match outcome {
        Ok(outcome) => {
            let response = AllocationResponse::from(outcome);
            tracing::info!(
                "Allocation {} placed {} of {} students ({}%)",
                response.allocation_id,
                response.total_allocated,
                response.total_students,
                response.allocation_rate
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => engine_unavailable("optimization", e),
    }
}
