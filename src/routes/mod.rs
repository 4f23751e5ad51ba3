// Route exports
pub mod applications;
pub mod jobs;
pub mod users;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::ApplicationBatchProcessor;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{JobBoardRepository, RepositoryError, UserService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<dyn JobBoardRepository>,
    pub users: UserService,
    pub processor: ApplicationBatchProcessor,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(users::configure)
            .configure(jobs::configure)
            .configure(applications::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.board.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a repository failure onto an HTTP error body
pub(crate) fn repository_error(error: &str, e: RepositoryError) -> HttpResponse {
    let (mut builder, status_code) = match e {
        RepositoryError::NotFound(_) => (HttpResponse::NotFound(), 404),
        RepositoryError::Conflict(_) => (HttpResponse::Conflict(), 409),
        RepositoryError::InvalidInput(_) => (HttpResponse::BadRequest(), 400),
        _ => {
            tracing::error!("{}: {}", error, e);
            (HttpResponse::InternalServerError(), 500)
        }
    };

    builder.json(ErrorResponse {
        error: error.to_string(),
        message: e.to_string(),
        status_code,
    })
}

/// Reject a request that failed validation
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
