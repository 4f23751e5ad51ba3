// Criterion benchmarks for the job portal matcher

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use job_portal::core::{ApplicationBatchProcessor, MatchEvaluator};
use job_portal::models::{ApplicationSubmission, Job, JobRequirements, RequestProfile};
use job_portal::services::InMemoryJobBoard;
use std::sync::Arc;

fn create_job(id: u64) -> Job {
    Job {
        id,
        company_id: 1,
        job_title: format!("Job {}", id),
        salary: "20 LPA".to_string(),
        min_notice_period: 15,
        max_notice_period: 60,
        budget: 2_000_000.0,
        job_description: "Benchmark job".to_string(),
        min_experience: (id % 6) as f64,
        max_experience: 10.0,
        location_ids: (1..=5).collect(),
        skill_ids: (id..id + 20).collect(),
        work_mode_ids: vec![1, 2],
        qualification_ids: vec![1, 2, 3],
        shift_ids: vec![1],
        job_type_ids: vec![1, 2],
        created_at: None,
    }
}

fn create_application(id: usize, job_id: u64) -> ApplicationSubmission {
    ApplicationSubmission {
        name: format!("Candidate {}", id),
        age: "30".to_string(),
        job_id,
        profile: RequestProfile {
            notice_period: 10 + (id % 40) as u64,
            location_ids: vec![(id % 8) as u64],
            skill_ids: (0..10).map(|s| (id as u64 * 7 + s) % 60).collect(),
            experience: (id % 9) as f64,
            qualification_ids: vec![(id % 4) as u64],
            shift_ids: vec![1],
            work_mode_ids: vec![(id % 3) as u64],
            job_type_ids: vec![1],
        },
    }
}

fn bench_compare(c: &mut Criterion) {
    let evaluator = MatchEvaluator::default();
    let job: JobRequirements = create_job(7).requirements();
    let application = create_application(3, 7);

    c.bench_function("compare", |b| {
        b.iter(|| evaluator.compare(black_box(&application), black_box(&job)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let board = Arc::new(InMemoryJobBoard::new());
    for id in 1..=50 {
        board.insert_job(create_job(id)).expect("insert job");
    }

    let mut group = c.benchmark_group("process_all");

    for size in [100, 1000].iter() {
        let batch: Vec<ApplicationSubmission> = (0..*size)
            .map(|i| create_application(i, (i as u64 % 60) + 1))
            .collect();

        for concurrency in [1, 32].iter() {
            let processor =
                ApplicationBatchProcessor::new(board.clone(), MatchEvaluator::default(), *concurrency);

            group.bench_with_input(
                BenchmarkId::new(format!("concurrency_{}", concurrency), size),
                &batch,
                |b, batch| b.iter(|| runtime.block_on(processor.process_all(black_box(batch.clone())))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_compare, bench_batch);
criterion_main!(benches);
