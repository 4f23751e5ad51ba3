use actix_web::{web, HttpResponse, Responder};

use crate::models::ApplicationSubmission;
use crate::routes::AppState;

/// Configure application matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/applications/process", web::post().to(process_applications))
        .route("/applications/report", web::post().to(report_applications));
}

/// Match a batch of applications against their jobs
///
/// POST /api/v1/applications/process
///
/// Request body:
/// ```json
/// [
///   {
///     "name": "string",
///     "age": "string",
///     "jid": 1,
///     "job_application": {
///       "noticePeriod": 30, "experience": 4.5,
///       "location": [1], "technologyStack": [4], "qualifications": [2],
///       "shifts": [1], "workmode": [1], "jobtype": [1]
///     }
///   }
/// ]
/// ```
///
/// Responds with the matching applications. Applications whose job cannot be
/// fetched are left out.
async fn process_applications(
    state: web::Data<AppState>,
    req: web::Json<Vec<ApplicationSubmission>>,
) -> impl Responder {
    let applications = req.into_inner();
    tracing::info!("Processing {} job applications", applications.len());

    let matches = state.processor.process_all(applications).await;

    HttpResponse::Ok().json(matches)
}

/// Same input as `/applications/process`, returning the full batch report
async fn report_applications(
    state: web::Data<AppState>,
    req: web::Json<Vec<ApplicationSubmission>>,
) -> impl Responder {
    let report = state.processor.process_with_report(req.into_inner()).await;

    HttpResponse::Ok().json(report)
}
