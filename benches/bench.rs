// Criterion benchmarks for Subset Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use subset_algo::core::{calculate_match_score, semester_value, Recommender};
use subset_algo::models::{CandidateKind, MatchProfile, ScoringWeights, Student};

fn create_candidate(id: usize) -> Student {
    let pool = ["KI", "Coding", "Gaming", "Sport", "Musik", "Kochen", "Lernen"];
    let interests: Vec<String> = (0..3)
        .map(|offset| pool[(id + offset) % pool.len()].to_string())
        .collect();

    Student {
        id: id as i64 + 2,
        name: format!("Student {}", id),
        major: "Informatik".to_string(),
        academic_period: Some(if id % 2 == 0 {
            format!("SoSe {}", 23 + id % 4)
        } else {
            format!("WiSe {}/{}", 23 + id % 4, 24 + id % 4)
        }),
        interests,
        bio: None,
        courses: vec!["Machine Learning".to_string()],
        club_ids: vec![(id % 5) as i64 + 200],
    }
}

fn create_profile() -> MatchProfile {
    MatchProfile {
        user_id: 1,
        interests: vec!["KI".to_string(), "Coding".to_string(), "Gaming".to_string()],
        academic_period: Some("SoSe 25".to_string()),
        club_ids: vec![200, 201],
        courses: vec!["Machine Learning".to_string()],
    }
}

fn bench_semester_value(c: &mut Criterion) {
    c.bench_function("semester_value", |b| {
        b.iter(|| semester_value(black_box("WiSe 25/26")));
    });
}

fn bench_match_score(c: &mut Criterion) {
    let candidate = create_candidate(0);
    let profile = create_profile();
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(black_box(&candidate), black_box(&profile), &weights)
        });
    });
}

fn bench_partition(c: &mut Criterion) {
    let recommender = Recommender::with_defaults();
    let profile = create_profile();

    let mut group = c.benchmark_group("partition");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<Student> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    recommender.partition(
                        black_box(&profile),
                        candidates.clone(),
                        CandidateKind::Student,
                        |s| s.id % 10 == 0,
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_semester_value,
    bench_match_score,
    bench_partition
);
criterion_main!(benches);
