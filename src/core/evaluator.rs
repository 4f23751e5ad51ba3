use serde::Serialize;
use thiserror::Error;

use crate::core::conditions::MatchCondition;
use crate::core::policy::ScoringPolicy;
use crate::models::{ApplicationSubmission, JobRequirements};

/// Errors that can occur while evaluating an application
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("application for job {job_id} has a non-finite experience value")]
    NonFiniteExperience { job_id: u64 },
}

/// How an application scored against a job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub satisfied: Vec<MatchCondition>,
    pub score: f64,
    pub required: f64,
}

/// Result of comparing one application against one job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        application: ApplicationSubmission,
        evaluation: Evaluation,
    },
    NotMatched {
        evaluation: Evaluation,
    },
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    pub fn evaluation(&self) -> &Evaluation {
        match self {
            MatchOutcome::Matched { evaluation, .. } | MatchOutcome::NotMatched { evaluation } => {
                evaluation
            }
        }
    }

    pub fn into_application(self) -> Option<ApplicationSubmission> {
        match self {
            MatchOutcome::Matched { application, .. } => Some(application),
            MatchOutcome::NotMatched { .. } => None,
        }
    }
}

/// Compares applications against job requirements under a scoring policy
///
/// Evaluation is pure: the same application and job always give the same
/// outcome.
#[derive(Debug, Clone, Default)]
pub struct MatchEvaluator {
    policy: ScoringPolicy,
}

impl MatchEvaluator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score `application` against `job`
    pub fn compare(
        &self,
        application: &ApplicationSubmission,
        job: &JobRequirements,
    ) -> Result<MatchOutcome, EvaluationError> {
        if !application.profile.experience.is_finite() {
            return Err(EvaluationError::NonFiniteExperience {
                job_id: application.job_id,
            });
        }

        let satisfied: Vec<MatchCondition> = MatchCondition::ALL
            .into_iter()
            .filter(|condition| condition.is_satisfied(&application.profile, job))
            .collect();

        let evaluation = Evaluation {
            score: self.policy.satisfied_weight(&satisfied),
            required: self.policy.required_weight(),
            satisfied,
        };

        if self.policy.is_match(&evaluation.satisfied) {
            Ok(MatchOutcome::Matched {
                application: application.clone(),
                evaluation,
            })
        } else {
            Ok(MatchOutcome::NotMatched { evaluation })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestProfile;

    fn job() -> JobRequirements {
        JobRequirements {
            job_id: 1,
            min_experience: 5.0,
            min_notice_period: 5,
            location_ids: vec![1, 2],
            skill_ids: vec![3],
            work_mode_ids: vec![1, 2],
            job_type_ids: vec![1],
            qualification_ids: vec![1, 9],
            shift_ids: vec![1],
        }
    }

    fn application() -> ApplicationSubmission {
        ApplicationSubmission {
            name: "Asha".to_string(),
            age: "29".to_string(),
            job_id: 1,
            profile: RequestProfile {
                notice_period: 10,
                location_ids: vec![2],
                skill_ids: vec![1],
                experience: 6.0,
                qualification_ids: vec![1],
                shift_ids: vec![1],
                work_mode_ids: vec![1],
                job_type_ids: vec![1],
            },
        }
    }

    #[test]
    fn test_seven_of_eight_matches() {
        let evaluator = MatchEvaluator::default();
        let outcome = evaluator.compare(&application(), &job()).unwrap();

        assert!(outcome.is_match());
        assert_eq!(outcome.evaluation().satisfied.len(), 7);
        assert!(!outcome.evaluation().satisfied.contains(&MatchCondition::Skill));
        assert_eq!(outcome.into_application(), Some(application()));
    }

    #[test]
    fn test_not_matched_carries_no_application() {
        let evaluator = MatchEvaluator::default();
        let mut app = application();
        app.profile = RequestProfile {
            notice_period: 0,
            location_ids: vec![],
            skill_ids: vec![],
            experience: 0.0,
            qualification_ids: vec![],
            shift_ids: vec![],
            work_mode_ids: vec![],
            job_type_ids: vec![],
        };

        let outcome = evaluator.compare(&app, &job()).unwrap();

        assert!(!outcome.is_match());
        assert_eq!(outcome.evaluation().score, 0.0);
        assert_eq!(outcome.into_application(), None);
    }

    #[test]
    fn test_non_finite_experience_is_rejected() {
        let evaluator = MatchEvaluator::default();
        let mut app = application();
        app.profile.experience = f64::NAN;

        assert_eq!(
            evaluator.compare(&app, &job()),
            Err(EvaluationError::NonFiniteExperience { job_id: 1 })
        );
    }
}
