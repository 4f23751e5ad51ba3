use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{Company, Job, JobRequirements, NewCompanyRequest, NewJobRequest, User};
use crate::services::repository::{
    db_id, db_ids, JobBoardRepository, JobStore, RepositoryError, UserRepository,
};

/// Job columns plus the six ID lists aggregated from the association tables
const JOB_SELECT: &str = r#"
    SELECT
        j.id, j.company_id, j.job_title, j.salary,
        j.min_notice_period, j.max_notice_period, j.budget,
        j.job_description, j.min_experience, j.max_experience, j.created_at,
        ARRAY(SELECT location_id FROM job_locations WHERE job_id = j.id ORDER BY location_id) AS location_ids,
        ARRAY(SELECT skill_id FROM job_skills WHERE job_id = j.id ORDER BY skill_id) AS skill_ids,
        ARRAY(SELECT work_mode_id FROM job_work_modes WHERE job_id = j.id ORDER BY work_mode_id) AS work_mode_ids,
        ARRAY(SELECT qualification_id FROM job_qualifications WHERE job_id = j.id ORDER BY qualification_id) AS qualification_ids,
        ARRAY(SELECT shift_id FROM job_shifts WHERE job_id = j.id ORDER BY shift_id) AS shift_ids,
        ARRAY(SELECT job_type_id FROM job_job_types WHERE job_id = j.id ORDER BY job_type_id) AS job_type_ids
    FROM jobs j
"#;

/// Association tables and their ID column, in insertion order
const JOB_ASSOCIATIONS: [(&str, &str); 6] = [
    ("job_locations", "location_id"),
    ("job_skills", "skill_id"),
    ("job_work_modes", "work_mode_id"),
    ("job_qualifications", "qualification_id"),
    ("job_shifts", "shift_id"),
    ("job_job_types", "job_type_id"),
];

/// PostgreSQL-backed job board
///
/// Companies and jobs live in their own tables; the per-category IDs of a
/// job live in one association table per category.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn company_from_row(row: &PgRow) -> Result<Company, sqlx::Error> {
    Ok(Company {
        id: row.try_get::<i64, _>("id")? as u64,
        company_name: row.try_get("company_name")?,
        address: row.try_get("address")?,
        domain: row.try_get("domain")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get::<i64, _>("id")? as u64,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

fn ids(row: &PgRow, column: &str) -> Result<Vec<u64>, sqlx::Error> {
    let values: Vec<i64> = row.try_get(column)?;
    Ok(values.into_iter().map(|v| v as u64).collect())
}

fn job_from_row(row: &PgRow) -> Result<Job, sqlx::Error> {
    Ok(Job {
        id: row.try_get::<i64, _>("id")? as u64,
        company_id: row.try_get::<i64, _>("company_id")? as u64,
        job_title: row.try_get("job_title")?,
        salary: row.try_get("salary")?,
        min_notice_period: row.try_get::<i64, _>("min_notice_period")? as u64,
        max_notice_period: row.try_get::<i64, _>("max_notice_period")? as u64,
        budget: row.try_get("budget")?,
        job_description: row.try_get("job_description")?,
        min_experience: row.try_get("min_experience")?,
        max_experience: row.try_get("max_experience")?,
        location_ids: ids(row, "location_ids")?,
        skill_ids: ids(row, "skill_ids")?,
        work_mode_ids: ids(row, "work_mode_ids")?,
        qualification_ids: ids(row, "qualification_ids")?,
        shift_ids: ids(row, "shift_ids")?,
        job_type_ids: ids(row, "job_type_ids")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl JobBoardRepository for PostgresClient {
    async fn create_company(&self, company: NewCompanyRequest) -> Result<Company, RepositoryError> {
        let query = r#"
            INSERT INTO companies (company_name, address, domain)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_name) DO NOTHING
            RETURNING id, company_name, address, domain, created_at
        "#;

        let row = sqlx::query(query)
            .bind(&company.company_name)
            .bind(&company.address)
            .bind(&company.domain)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::Conflict(format!("company {} already exists", company.company_name))
            })?;

        let created = company_from_row(&row)?;
        tracing::debug!("Created company {} ({})", created.id, created.company_name);
        Ok(created)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let query = r#"
            SELECT id, company_name, address, domain, created_at
            FROM companies
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let companies: Result<Vec<Company>, _> = rows.iter().map(company_from_row).collect();
        Ok(companies?)
    }

    async fn get_company(&self, company_id: u64) -> Result<Company, RepositoryError> {
        let query = r#"
            SELECT id, company_name, address, domain, created_at
            FROM companies
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(db_id(company_id)?)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("company {}", company_id)))?;

        Ok(company_from_row(&row)?)
    }

    async fn create_job(&self, company_id: u64, job: NewJobRequest) -> Result<u64, RepositoryError> {
        let company_key = db_id(company_id)?;
        let min_notice_period = db_id(job.min_notice_period)?;
        let max_notice_period = db_id(job.max_notice_period)?;
        let id_lists = [
            db_ids(&job.location_ids)?,
            db_ids(&job.skill_ids)?,
            db_ids(&job.work_mode_ids)?,
            db_ids(&job.qualification_ids)?,
            db_ids(&job.shift_ids)?,
            db_ids(&job.job_type_ids)?,
        ];

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM companies WHERE id = $1")
            .bind(company_key)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound(format!("company {}", company_id)));
        }

        let query = r#"
            INSERT INTO jobs (
                company_id, job_title, salary, min_notice_period, max_notice_period,
                budget, job_description, min_experience, max_experience
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
        "#;

        let job_id: i64 = sqlx::query_scalar(query)
            .bind(company_key)
            .bind(&job.job_title)
            .bind(&job.salary)
            .bind(min_notice_period)
            .bind(max_notice_period)
            .bind(job.budget)
            .bind(&job.job_description)
            .bind(job.min_experience)
            .bind(job.max_experience)
            .fetch_one(&mut *tx)
            .await?;

        for ((table, column), values) in JOB_ASSOCIATIONS.iter().zip(id_lists) {
            if values.is_empty() {
                continue;
            }
            let insert = format!(
                "INSERT INTO {table} (job_id, {column}) \
                 SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING"
            );
            sqlx::query(&insert)
                .bind(job_id)
                .bind(values)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Posted job {} for company {}", job_id, company_id);
        Ok(job_id as u64)
    }

    async fn jobs_by_company(&self, company_id: u64) -> Result<Vec<Job>, RepositoryError> {
        let query = format!("{JOB_SELECT} WHERE j.company_id = $1 ORDER BY j.id");

        let rows = sqlx::query(&query)
            .bind(db_id(company_id)?)
            .fetch_all(&self.pool)
            .await?;

        let jobs: Result<Vec<Job>, _> = rows.iter().map(job_from_row).collect();
        Ok(jobs?)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        let query = format!("{JOB_SELECT} ORDER BY j.id");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let jobs: Result<Vec<Job>, _> = rows.iter().map(job_from_row).collect();
        Ok(jobs?)
    }

    async fn get_job(&self, job_id: u64) -> Result<Job, RepositoryError> {
        let query = format!("{JOB_SELECT} WHERE j.id = $1");

        let row = sqlx::query(&query)
            .bind(db_id(job_id)?)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", job_id)))?;

        Ok(job_from_row(&row)?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl JobStore for PostgresClient {
    async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError> {
        self.get_job(job_id).await.map(|job| job.requirements())
    }
}

#[async_trait]
impl UserRepository for PostgresClient {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let query = r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id, username, email, password_hash, created_at
        "#;

        let row = sqlx::query(query)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::Conflict(format!("user {} or email {} already registered", username, email))
            })?;

        let user = user_from_row(&row)?;
        tracing::debug!("Created user {}", user.id);
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let query = r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", email)))?;

        Ok(user_from_row(&row)?)
    }
}
