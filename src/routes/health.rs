use actix_web::{web, HttpResponse, Responder};

use crate::models::{HealthResponse, ReadinessResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "Internship Matching Engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Readiness check; the engine has no external dependencies to wait for
async fn readiness_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ReadinessResponse {
        status: "ready".to_string(),
        skill_embeddings_loaded: state.skill_embeddings_loaded,
        timestamp: chrono::Utc::now(),
    })
}
