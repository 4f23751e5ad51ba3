// Core matching exports
pub mod batch;
pub mod conditions;
pub mod evaluator;
pub mod policy;

pub use batch::{ApplicationBatchProcessor, BatchReport, SkipReason, SkippedApplication, DEFAULT_MAX_CONCURRENCY};
pub use conditions::{shares_any, MatchCondition};
pub use evaluator::{EvaluationError, Evaluation, MatchEvaluator, MatchOutcome};
pub use policy::{ConditionWeights, PolicyError, ScoringPolicy, DEFAULT_THRESHOLD};
