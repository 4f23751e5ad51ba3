use std::sync::Arc;
use thiserror::Error;

use crate::models::{User, UserLogin, UserSignup};
use crate::services::repository::{RepositoryError, UserRepository};

/// Errors that can occur during signup or login
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Registers users and checks their credentials
///
/// Hashing runs on the blocking pool so bcrypt's work factor never stalls
/// the async workers. Login only verifies credentials; no token is issued.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Hash the password and store the new user
    pub async fn signup(&self, signup: UserSignup) -> Result<User, UserError> {
        let cost = self.bcrypt_cost;
        let password = signup.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user = self
            .repo
            .create_user(&signup.username, &signup.email, &password_hash)
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Check an email and password pair, returning the matching user
    pub async fn login(&self, login: UserLogin) -> Result<User, UserError> {
        let user = match self.repo.find_user_by_email(&login.email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                tracing::info!("Login for unknown email");
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let hash = user.password_hash.clone();
        let password = login.password;
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

        if !valid {
            tracing::info!("Wrong password for user {}", user.id);
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}
