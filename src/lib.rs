//! Job Portal - job board backend with concurrent application matching
//!
//! Companies post jobs with requirement sets. Candidate applications are
//! scored against the job they target and batches are evaluated concurrently.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{ApplicationBatchProcessor, BatchReport, MatchEvaluator, MatchOutcome, ScoringPolicy};
pub use models::{ApplicationSubmission, Company, Job, JobRequirements, RequestProfile};
pub use services::{InMemoryJobBoard, JobBoardRepository, JobStore, RepositoryError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let evaluator = MatchEvaluator::default();
        assert_eq!(evaluator.policy().required_weight(), 4.0);
    }
}
