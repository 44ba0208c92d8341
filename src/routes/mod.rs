// Route exports
pub mod analytics;
pub mod health;
pub mod matching;

use actix_web::web;

use crate::core::Matcher;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    /// Number of skills in the configured taxonomy (0 when exact overlap is used)
    pub skill_embeddings_loaded: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .service(web::scope("/matching").configure(matching::configure))
            .service(web::scope("/analytics").configure(analytics::configure)),
    );
}
