use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizplane_core::model::{Answers, Question, Quiz, QuizOption};
use quizplane_core::scoring::{get_result, get_score, validate_answers};
use quizplane_core::traits::AxisMethods;

fn make_quiz(n: u32) -> Quiz {
    let options = vec![
        QuizOption::new("Never", "0").with_score(0.0),
        QuizOption::new("Sometimes", "1").with_score(1.0),
        QuizOption::new("Often", "2").with_score(2.0),
    ];
    let questions = (0..n)
        .map(|i| {
            let q = Question::new(i, format!("Question {i}"))
                .with_target(if i % 2 == 0 { "x" } else { "y" });
            if i % 3 == 0 {
                q.with_scores([("0", -1.0), ("1", 0.5), ("2", 3.0)])
            } else {
                q
            }
        })
        .collect();
    Quiz::new(questions, options)
}

fn make_answers(n: u32) -> Answers {
    (0..n).map(|i| (i.to_string(), (i % 3).to_string())).collect()
}

fn bench_get_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_score");

    for n in [10u32, 50, 200] {
        let quiz = make_quiz(n);
        let answers = make_answers(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| get_score(black_box(&answers), black_box(&quiz)))
        });
    }

    group.finish();
}

fn bench_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("results");
    let quiz = make_quiz(50);
    let answers = make_answers(50);

    group.bench_function("validate", |b| {
        b.iter(|| validate_answers(black_box(Some(&answers)), black_box(&quiz)))
    });

    group.bench_function("default_result", |b| {
        b.iter(|| get_result(black_box(&answers), black_box(&quiz)))
    });

    group.bench_function("axis_scores", |b| {
        b.iter(|| AxisMethods::axis_scores(black_box(&answers), black_box(&quiz)))
    });

    group.finish();
}

criterion_group!(benches, bench_get_score, bench_results);
criterion_main!(benches);
