use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::models::{Company, Job, JobRequirements, NewCompanyRequest, NewJobRequest, User};
use crate::services::repository::{
    db_id, db_ids, JobBoardRepository, JobStore, RepositoryError, UserRepository,
};

#[derive(Debug, Default)]
struct BoardState {
    companies: BTreeMap<u64, Company>,
    jobs: BTreeMap<u64, Job>,
    users: BTreeMap<u64, User>,
    next_company_id: u64,
    next_job_id: u64,
    next_user_id: u64,
}

/// In-process job board and user store
///
/// Backs `store.backend = "memory"`, tests and benches. IDs start at 1 and
/// increase monotonically, like the PostgreSQL sequences.
#[derive(Debug, Default)]
pub struct InMemoryJobBoard {
    state: RwLock<BoardState>,
}

impl InMemoryJobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed job, replacing any job with the same id
    pub fn insert_job(&self, job: Job) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        state.next_job_id = state.next_job_id.max(job.id);
        state.jobs.insert(job.id, job);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BoardState>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unavailable("job board lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BoardState>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unavailable("job board lock poisoned".into()))
    }
}

#[async_trait]
impl JobBoardRepository for InMemoryJobBoard {
    async fn create_company(&self, company: NewCompanyRequest) -> Result<Company, RepositoryError> {
        let mut state = self.write()?;

        if state
            .companies
            .values()
            .any(|c| c.company_name == company.company_name)
        {
            return Err(RepositoryError::Conflict(format!(
                "company {} already exists",
                company.company_name
            )));
        }

        state.next_company_id += 1;
        let created = Company {
            id: state.next_company_id,
            company_name: company.company_name,
            address: company.address,
            domain: company.domain,
            created_at: Some(chrono::Utc::now()),
        };
        state.companies.insert(created.id, created.clone());

        tracing::debug!("Created company {} ({})", created.id, created.company_name);
        Ok(created)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        Ok(self.read()?.companies.values().cloned().collect())
    }

    async fn get_company(&self, company_id: u64) -> Result<Company, RepositoryError> {
        self.read()?
            .companies
            .get(&company_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("company {}", company_id)))
    }

    async fn create_job(&self, company_id: u64, job: NewJobRequest) -> Result<u64, RepositoryError> {
        // Same BIGINT bounds as the PostgreSQL schema
        db_id(job.min_notice_period)?;
        db_id(job.max_notice_period)?;
        for ids in [
            &job.location_ids,
            &job.skill_ids,
            &job.work_mode_ids,
            &job.qualification_ids,
            &job.shift_ids,
            &job.job_type_ids,
        ] {
            db_ids(ids)?;
        }

        let mut state = self.write()?;

        if !state.companies.contains_key(&company_id) {
            return Err(RepositoryError::NotFound(format!("company {}", company_id)));
        }

        state.next_job_id += 1;
        let id = state.next_job_id;
        state.jobs.insert(
            id,
            Job {
                id,
                company_id,
                job_title: job.job_title,
                salary: job.salary,
                min_notice_period: job.min_notice_period,
                max_notice_period: job.max_notice_period,
                budget: job.budget,
                job_description: job.job_description,
                min_experience: job.min_experience,
                max_experience: job.max_experience,
                location_ids: job.location_ids,
                skill_ids: job.skill_ids,
                work_mode_ids: job.work_mode_ids,
                qualification_ids: job.qualification_ids,
                shift_ids: job.shift_ids,
                job_type_ids: job.job_type_ids,
                created_at: Some(chrono::Utc::now()),
            },
        );

        tracing::debug!("Posted job {} for company {}", id, company_id);
        Ok(id)
    }

    async fn jobs_by_company(&self, company_id: u64) -> Result<Vec<Job>, RepositoryError> {
        Ok(self
            .read()?
            .jobs
            .values()
            .filter(|job| job.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.read()?.jobs.values().cloned().collect())
    }

    async fn get_job(&self, job_id: u64) -> Result<Job, RepositoryError> {
        self.read()?
            .jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", job_id)))
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        self.read().map(|_| true)
    }
}

#[async_trait]
impl JobStore for InMemoryJobBoard {
    async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError> {
        self.read()?
            .jobs
            .get(&job_id)
            .map(Job::requirements)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", job_id)))
    }
}

#[async_trait]
impl UserRepository for InMemoryJobBoard {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut state = self.write()?;

        if state
            .users
            .values()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(RepositoryError::Conflict(format!(
                "user {} or email {} already registered",
                username, email
            )));
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(chrono::Utc::now()),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        self.read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str) -> NewCompanyRequest {
        NewCompanyRequest {
            company_name: name.to_string(),
            address: "BENGALURU".to_string(),
            domain: "IT".to_string(),
        }
    }

    fn job_request() -> NewJobRequest {
        NewJobRequest {
            job_title: "Platform Engineer".to_string(),
            salary: "18 LPA".to_string(),
            min_notice_period: 10,
            max_notice_period: 30,
            budget: 1_800_000.0,
            job_description: "Own the deploy pipeline".to_string(),
            min_experience: 3.0,
            max_experience: 7.0,
            location_ids: vec![1, 2],
            skill_ids: vec![4],
            work_mode_ids: vec![1],
            qualification_ids: vec![2],
            shift_ids: vec![1],
            job_type_ids: vec![1],
        }
    }

    #[tokio::test]
    async fn test_company_names_are_unique() {
        let board = InMemoryJobBoard::new();
        let created = board.create_company(company("TEK")).await.unwrap();
        assert_eq!(created.id, 1);

        let err = board.create_company(company("TEK")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_job_requires_existing_company() {
        let board = InMemoryJobBoard::new();
        let err = board.create_job(7, job_request()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_job_ids_past_bigint_are_rejected() {
        let board = InMemoryJobBoard::new();
        let company = board.create_company(company("TEK")).await.unwrap();

        let mut request = job_request();
        request.skill_ids = vec![4, u64::MAX];

        let err = board.create_job(company.id, request).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidInput(_)));
        assert!(board.list_jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_posted_job_is_visible_as_requirements() {
        let board = InMemoryJobBoard::new();
        let company = board.create_company(company("TEK")).await.unwrap();
        let job_id = board.create_job(company.id, job_request()).await.unwrap();

        let requirements = board.get_job_requirements(job_id).await.unwrap();
        assert_eq!(requirements.job_id, job_id);
        assert_eq!(requirements.min_notice_period, 10);
        assert_eq!(requirements.location_ids, vec![1, 2]);

        assert_eq!(board.jobs_by_company(company.id).await.unwrap().len(), 1);
        assert!(board.jobs_by_company(company.id + 1).await.unwrap().is_empty());
        assert!(board.get_job_requirements(job_id + 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_user_username_and_email_are_unique() {
        let board = InMemoryJobBoard::new();
        let user = board
            .create_user("asha", "asha@example.com", "hash")
            .await
            .unwrap();
        assert_eq!(user.id, 1);

        let err = board
            .create_user("asha", "other@example.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = board
            .create_user("ravi", "asha@example.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = board.find_user_by_email("asha@example.com").await.unwrap();
        assert_eq!(found.password_hash, "hash");
        assert!(board
            .find_user_by_email("nobody@example.com")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
