use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{CreatedResponse, NewCompanyRequest, NewJobRequest};
use crate::routes::{repository_error, validation_error, AppState};

/// Configure company and job routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/companies", web::post().to(create_company))
        .route("/companies", web::get().to(list_companies))
        .route("/companies/{company_id}", web::get().to(get_company))
        .route("/companies/{company_id}/jobs", web::post().to(create_job))
        .route("/companies/{company_id}/jobs", web::get().to(jobs_by_company))
        .route("/jobs", web::get().to(list_jobs))
        .route("/jobs/{job_id}", web::get().to(get_job));
}

/// POST /api/v1/companies
async fn create_company(
    state: web::Data<AppState>,
    req: web::Json<NewCompanyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.board.create_company(req.into_inner()).await {
        Ok(company) => {
            tracing::info!("Created company {}", company.id);
            HttpResponse::Ok().json(company)
        }
        Err(e) => repository_error("Failed to create company", e),
    }
}

async fn list_companies(state: web::Data<AppState>) -> impl Responder {
    match state.board.list_companies().await {
        Ok(companies) => HttpResponse::Ok().json(companies),
        Err(e) => repository_error("Failed to fetch companies", e),
    }
}

async fn get_company(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    match state.board.get_company(path.into_inner()).await {
        Ok(company) => HttpResponse::Ok().json(company),
        Err(e) => repository_error("Failed to fetch company", e),
    }
}

/// POST /api/v1/companies/{company_id}/jobs
///
/// Request body:
/// ```json
/// {
///   "jobTitle": "string",
///   "sal": "string",
///   "minNp": 15, "maxNp": 60,
///   "budget": 1200000.0,
///   "jobDesc": "string",
///   "minExp": 2.0, "maxExp": 5.0,
///   "locationIds": [1], "skillIds": [4, 7], "workModeIds": [1],
///   "qualificationIds": [2], "shiftIds": [1], "jobTypeIds": [1]
/// }
/// ```
async fn create_job(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    req: web::Json<NewJobRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let company_id = path.into_inner();

    match state.board.create_job(company_id, req.into_inner()).await {
        Ok(id) => {
            tracing::info!("Posted job {} for company {}", id, company_id);
            HttpResponse::Ok().json(CreatedResponse { id })
        }
        Err(e) => repository_error("Failed to post job", e),
    }
}

async fn jobs_by_company(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    match state.board.jobs_by_company(path.into_inner()).await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => repository_error("Failed to fetch jobs", e),
    }
}

async fn list_jobs(state: web::Data<AppState>) -> impl Responder {
    match state.board.list_jobs().await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => repository_error("Failed to fetch jobs", e),
    }
}

async fn get_job(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    match state.board.get_job(path.into_inner()).await {
        Ok(job) => HttpResponse::Ok().json(job),
        Err(e) => repository_error("Failed to fetch job", e),
    }
}
