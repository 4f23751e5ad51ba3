// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ApplicationSubmission, Company, Job, JobRequirements, RequestProfile, User};
pub use requests::{NewCompanyRequest, NewJobRequest, UserLogin, UserSignup};
pub use responses::{CreatedResponse, ErrorResponse, HealthResponse};
