use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::NaiveDate;
use quizgrade_core::model::{Question, QuestionKind, Submission};
use quizgrade_core::report::build_report_at;
use quizgrade_core::statistics::score;

fn make_page(len: usize) -> (Vec<Question>, Vec<Option<Submission>>) {
    let mut questions = Vec::with_capacity(len);
    let mut submissions = Vec::with_capacity(len);
    for i in 0..len {
        let options: Vec<String> = (0..4).map(|o| format!("Option {o}")).collect();
        if i % 2 == 0 {
            questions.push(Question {
                id: i as u32,
                text: format!("Single {i}"),
                kind: QuestionKind::SingleChoice { correct_answer: 1 },
                options,
                explanation: String::new(),
            });
            submissions.push(Some(Submission::SingleChoice(Some(i % 4))));
        } else {
            questions.push(Question {
                id: i as u32,
                text: format!("Multi {i}"),
                kind: QuestionKind::MultipleChoice {
                    correct_answers: [0, 2].into_iter().collect(),
                },
                options,
                explanation: String::new(),
            });
            submissions.push(Some(Submission::MultipleChoice(vec![2, i % 4])));
        }
    }
    (questions, submissions)
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for len in [10, 50] {
        let (questions, submissions) = make_page(len);
        group.bench_function(format!("questions={len}"), |b| {
            b.iter(|| score(black_box(&questions), black_box(&submissions)))
        });
    }

    group.finish();
}

fn bench_build_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_report");
    let timestamp = NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let links = vec!["https://example.org/material.pdf".to_string()];

    let (questions, submissions) = make_page(30);
    group.bench_function("questions=30", |b| {
        b.iter(|| {
            build_report_at(
                "bench",
                "Section",
                "Subsection",
                black_box(&questions),
                black_box(&submissions),
                &links,
                timestamp,
            )
            .to_text()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_build_report);
criterion_main!(benches);
