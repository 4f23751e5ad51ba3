use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::conditions::MatchCondition;

/// Errors raised when building a scoring policy
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("weight for {0} must be finite and non-negative, got {1}")]
    InvalidWeight(MatchCondition, f64),

    #[error("total condition weight must be positive")]
    ZeroTotalWeight,

    #[error("threshold must be within (0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

/// Weight of each condition in the match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionWeights {
    pub experience: f64,
    pub notice_period: f64,
    pub work_mode: f64,
    pub job_type: f64,
    pub location: f64,
    pub qualification: f64,
    pub skill: f64,
    pub shift: f64,
}

impl ConditionWeights {
    pub fn weight(&self, condition: MatchCondition) -> f64 {
        match condition {
            MatchCondition::Experience => self.experience,
            MatchCondition::NoticePeriod => self.notice_period,
            MatchCondition::WorkMode => self.work_mode,
            MatchCondition::JobType => self.job_type,
            MatchCondition::Location => self.location,
            MatchCondition::Qualification => self.qualification,
            MatchCondition::Skill => self.skill,
            MatchCondition::Shift => self.shift,
        }
    }

    pub fn total(&self) -> f64 {
        MatchCondition::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

impl Default for ConditionWeights {
    /// Every condition counts once
    fn default() -> Self {
        Self {
            experience: 1.0,
            notice_period: 1.0,
            work_mode: 1.0,
            job_type: 1.0,
            location: 1.0,
            qualification: 1.0,
            skill: 1.0,
            shift: 1.0,
        }
    }
}

/// Weighted scoring rule deciding whether an application matches a job
///
/// An application matches when the weight of its satisfied conditions reaches
/// `threshold` of the total weight. The default policy (equal weights, 0.5)
/// is the majority rule: four of the eight conditions are enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringPolicy {
    weights: ConditionWeights,
    threshold: f64,
}

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Relative slack on the threshold comparison, so weights such as 0.7 still
/// meet an exact boundary after rounding
const SCORE_EPSILON: f64 = 1e-9;

impl ScoringPolicy {
    pub fn new(weights: ConditionWeights, threshold: f64) -> Result<Self, PolicyError> {
        for condition in MatchCondition::ALL {
            let weight = weights.weight(condition);
            if !weight.is_finite() || weight < 0.0 {
                return Err(PolicyError::InvalidWeight(condition, weight));
            }
        }

        if weights.total() <= 0.0 {
            return Err(PolicyError::ZeroTotalWeight);
        }

        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(PolicyError::ThresholdOutOfRange(threshold));
        }

        Ok(Self { weights, threshold })
    }

    pub fn weights(&self) -> &ConditionWeights {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Weight the satisfied conditions have to reach
    pub fn required_weight(&self) -> f64 {
        self.threshold * self.weights.total()
    }

    pub fn satisfied_weight(&self, satisfied: &[MatchCondition]) -> f64 {
        satisfied.iter().map(|c| self.weights.weight(*c)).sum()
    }

    #[inline]
    pub fn is_match(&self, satisfied: &[MatchCondition]) -> bool {
        let total = self.weights.total();
        self.satisfied_weight(satisfied) + SCORE_EPSILON * total >= self.required_weight()
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: ConditionWeights::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
