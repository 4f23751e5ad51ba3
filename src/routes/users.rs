use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, UserLogin, UserSignup};
use crate::routes::{repository_error, validation_error, AppState};
use crate::services::UserError;

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login));
}

/// POST /api/v1/register
///
/// Request body:
/// ```json
/// { "name": "string", "email": "string", "password": "string" }
/// ```
async fn register(state: web::Data<AppState>, req: web::Json<UserSignup>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.users.signup(req.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => user_error("Failed to register user", e),
    }
}

/// POST /api/v1/login
///
/// Verifies the credentials and responds with the user.
async fn login(state: web::Data<AppState>, req: web::Json<UserLogin>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.users.login(req.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => user_error("Login failed", e),
    }
}

fn user_error(error: &str, e: UserError) -> HttpResponse {
    match e {
        UserError::Repository(e) => repository_error(error, e),
        UserError::InvalidCredentials => HttpResponse::Unauthorized().json(ErrorResponse {
            error: error.to_string(),
            message: e.to_string(),
            status_code: 401,
        }),
        _ => {
            tracing::error!("{}: {}", error, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
