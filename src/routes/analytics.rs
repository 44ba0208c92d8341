use actix_web::{web, HttpResponse, Responder};

use crate::core::analytics::summarize;
use crate::models::AnalyticsRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate", web::post().to(generate_analytics));
}

/// POST /api/v1/analytics/generate
async fn generate_analytics(req: web::Json<AnalyticsRequest>) -> impl Responder {
    tracing::info!("Generating analytics for {} match results", req.match_results.len());

    HttpResponse::Ok().json(summarize(&req.match_results))
}
