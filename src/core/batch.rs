use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::core::evaluator::{MatchEvaluator, MatchOutcome};
use crate::models::ApplicationSubmission;
use crate::services::{JobStore, RepositoryError};

/// Default number of job lookups in flight per batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 32;

/// Why an application did not take part in matching
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    JobNotFound,
    StoreUnavailable(String),
    InvalidApplication(String),
}

/// An application dropped from the batch, with its position in the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedApplication {
    pub index: usize,
    #[serde(rename = "jid")]
    pub job_id: u64,
    pub reason: SkipReason,
}

/// Everything a batch produced
///
/// `matches` is in completion order. Items that were looked up and scored
/// but fell short of the policy are only counted in `rejected`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub matches: Vec<ApplicationSubmission>,
    pub skipped: Vec<SkippedApplication>,
    pub rejected: usize,
    pub failed_tasks: usize,
    pub total: usize,
}

/// Message a task sends through the result channel
enum ItemOutcome {
    Matched(ApplicationSubmission),
    Rejected,
    Skipped(SkippedApplication),
}

/// Evaluates batches of applications concurrently against their jobs
///
/// Each application gets its own task. At most `max_concurrency` tasks
/// exist at once; every task reports through one mpsc channel, which is the
/// only place results are collected. A failed lookup drops the application
/// and never fails the batch.
#[derive(Clone)]
pub struct ApplicationBatchProcessor {
    store: Arc<dyn JobStore>,
    evaluator: MatchEvaluator,
    max_concurrency: usize,
}

impl ApplicationBatchProcessor {
    pub fn new(store: Arc<dyn JobStore>, evaluator: MatchEvaluator, max_concurrency: usize) -> Self {
        Self {
            store,
            evaluator,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn evaluator(&self) -> &MatchEvaluator {
        &self.evaluator
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Return the applications that match their job
    pub async fn process_all(&self, applications: Vec<ApplicationSubmission>) -> Vec<ApplicationSubmission> {
        self.process_with_report(applications).await.matches
    }

    /// Process a batch and report matches alongside skipped and rejected items
    pub async fn process_with_report(&self, applications: Vec<ApplicationSubmission>) -> BatchReport {
        let total = applications.len();
        let batch_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("application_batch", %batch_id, total);

        async move {
            let permits = Arc::new(Semaphore::new(self.max_concurrency));
            let (tx, mut rx) = mpsc::unbounded_channel::<ItemOutcome>();
            let mut tasks = JoinSet::new();
            let mut report = BatchReport {
                total,
                ..BatchReport::default()
            };

            for (index, application) in applications.into_iter().enumerate() {
                // Never closed, so acquisition only waits
                let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                    break;
                };

                let store = Arc::clone(&self.store);
                let evaluator = self.evaluator.clone();
                let tx = tx.clone();

                tasks.spawn(
                    async move {
                        let _permit = permit;
                        let outcome = evaluate_one(store.as_ref(), &evaluator, index, application).await;
                        // The receiver outlives every task
                        let _ = tx.send(outcome);
                    }
                    .in_current_span(),
                );
            }

            // Channel closes once the last task drops its sender
            drop(tx);

            while let Some(outcome) = rx.recv().await {
                match outcome {
                    ItemOutcome::Matched(application) => report.matches.push(application),
                    ItemOutcome::Rejected => report.rejected += 1,
                    ItemOutcome::Skipped(skipped) => {
                        tracing::debug!(
                            "Skipping application {} for job {}: {:?}",
                            skipped.index,
                            skipped.job_id,
                            skipped.reason
                        );
                        report.skipped.push(skipped);
                    }
                }
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Application task failed: {}", e);
                    report.failed_tasks += 1;
                }
            }

            tracing::info!(
                "Batch finished: {} matched, {} rejected, {} skipped of {}",
                report.matches.len(),
                report.rejected,
                report.skipped.len(),
                report.total
            );

            report
        }
        .instrument(span)
        .await
    }
}

async fn evaluate_one(
    store: &dyn JobStore,
    evaluator: &MatchEvaluator,
    index: usize,
    application: ApplicationSubmission,
) -> ItemOutcome {
    let job_id = application.job_id;
    let skip = |reason| {
        ItemOutcome::Skipped(SkippedApplication {
            index,
            job_id,
            reason,
        })
    };

    let job = match store.get_job_requirements(job_id).await {
        Ok(job) => job,
        Err(RepositoryError::NotFound(_)) => return skip(SkipReason::JobNotFound),
        Err(e) => return skip(SkipReason::StoreUnavailable(e.to_string())),
    };

    match evaluator.compare(&application, &job) {
        Ok(MatchOutcome::Matched { application, .. }) => ItemOutcome::Matched(application),
        Ok(MatchOutcome::NotMatched { .. }) => ItemOutcome::Rejected,
        Err(e) => skip(SkipReason::InvalidApplication(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobRequirements, RequestProfile};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store that knows job 1 and counts how many lookups overlap
    struct TrackingStore {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TrackingStore {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl JobStore for TrackingStore {
        async fn get_job_requirements(&self, job_id: u64) -> Result<JobRequirements, RepositoryError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match job_id {
                1 => Ok(JobRequirements {
                    job_id,
                    min_experience: 2.0,
                    min_notice_period: 15,
                    location_ids: vec![1],
                    skill_ids: vec![4],
                    work_mode_ids: vec![1],
                    job_type_ids: vec![1],
                    qualification_ids: vec![1],
                    shift_ids: vec![1],
                }),
                500 => Err(RepositoryError::Unavailable("connection reset".into())),
                _ => Err(RepositoryError::NotFound(format!("job {}", job_id))),
            }
        }
    }

    fn application(job_id: u64, experience: f64) -> ApplicationSubmission {
        ApplicationSubmission {
            name: format!("candidate-{}", job_id),
            age: "30".to_string(),
            job_id,
            profile: RequestProfile {
                notice_period: 30,
                location_ids: vec![1],
                skill_ids: vec![4],
                experience,
                qualification_ids: vec![],
                shift_ids: vec![],
                work_mode_ids: vec![],
                job_type_ids: vec![],
            },
        }
    }

    #[tokio::test]
    async fn test_report_classifies_every_item() {
        let processor =
            ApplicationBatchProcessor::new(Arc::new(TrackingStore::new()), MatchEvaluator::default(), 4);

        let mut weak = application(1, 0.0);
        weak.profile.location_ids.clear();
        weak.profile.skill_ids.clear();

        let report = processor
            .process_with_report(vec![
                application(1, 5.0),
                application(99, 5.0),
                application(500, 5.0),
                application(1, f64::INFINITY),
                weak,
            ])
            .await;

        assert_eq!(report.total, 5);
        assert_eq!(report.matches, vec![application(1, 5.0)]);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.failed_tasks, 0);

        let mut skipped = report.skipped.clone();
        skipped.sort_by_key(|s| s.index);
        assert_eq!(skipped.len(), 3);
        assert_eq!(skipped[0].reason, SkipReason::JobNotFound);
        assert!(matches!(skipped[1].reason, SkipReason::StoreUnavailable(_)));
        assert!(matches!(skipped[2].reason, SkipReason::InvalidApplication(_)));
    }

    #[tokio::test]
    async fn test_lookups_stay_within_concurrency_limit() {
        let store = Arc::new(TrackingStore::new());
        let processor = ApplicationBatchProcessor::new(store.clone(), MatchEvaluator::default(), 3);

        let applications: Vec<_> = (0..20).map(|_| application(1, 5.0)).collect();
        let matches = processor.process_all(applications).await;

        assert_eq!(matches.len(), 20);
        assert!(store.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let processor =
            ApplicationBatchProcessor::new(Arc::new(TrackingStore::new()), MatchEvaluator::default(), 0);

        assert_eq!(processor.max_concurrency(), 1);
        assert!(processor.process_all(Vec::new()).await.is_empty());
    }
}
