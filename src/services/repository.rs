use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Company, Job, JobRequirements, NewCompanyRequest, NewJobRequest, User};

/// Errors that can occur when reading or writing job board data
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

/// Convert an id into the BIGINT range the store keys on
pub(crate) fn db_id(value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::InvalidInput(format!("id {} exceeds the BIGINT range", value)))
}

pub(crate) fn db_ids(values: &[u64]) -> Result<Vec<i64>, RepositoryError> {
    values.iter().map(|v| db_id(*v)).collect()
}

/// Single-job lookup consumed by the matching engine
///
/// Implementations must be safe for concurrent calls.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError>;
}

/// Company and job persistence behind the HTTP handlers
#[async_trait]
pub trait JobBoardRepository: Send + Sync {
    async fn create_company(&self, company: NewCompanyRequest) -> Result<Company, RepositoryError>;

    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError>;

    async fn get_company(&self, company_id: u64) -> Result<Company, RepositoryError>;

    /// Post a job for an existing company, returning the new job id
    async fn create_job(&self, company_id: u64, job: NewJobRequest) -> Result<u64, RepositoryError>;

    async fn jobs_by_company(&self, company_id: u64) -> Result<Vec<Job>, RepositoryError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, RepositoryError>;

    async fn get_job(&self, job_id: u64) -> Result<Job, RepositoryError>;

    async fn health_check(&self) -> Result<bool, RepositoryError>;
}

/// User accounts; passwords arrive here already hashed
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Username and email are both unique.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_id_accepts_bigint_range() {
        assert_eq!(db_id(0).unwrap(), 0);
        assert_eq!(db_id(i64::MAX as u64).unwrap(), i64::MAX);
        assert_eq!(db_ids(&[1, 2, 3]).unwrap(), vec![1i64, 2, 3]);
    }

    #[test]
    fn test_db_id_rejects_values_past_bigint() {
        let err = db_id(i64::MAX as u64 + 1).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidInput(_)));

        let err = db_ids(&[4, u64::MAX]).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidInput(_)));
    }
}
