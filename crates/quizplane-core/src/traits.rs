//! Answer-handling strategies.
//!
//! A quiz carries an optional [`QuizMethods`] implementation. Every method
//! has a default body that calls the built-in scoring engine, so a strategy
//! only overrides the steps it cares about.

use std::sync::Arc;

use crate::error::QuizError;
use crate::form::Form;
use crate::model::{Answers, Quiz, QuizResult, ValidateError};
use crate::scoring;

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// Extraction, validation and result computation for a quiz.
pub trait QuizMethods: Send + Sync {
    /// Short identifier used in quiz definition files.
    fn name(&self) -> &str;

    /// Read submitted answers from a form.
    fn get_answers(&self, form: Option<&Form>) -> Option<Answers> {
        scoring::get_answers(form)
    }

    /// Return an error message when the submission is incomplete.
    fn validate_answers(&self, answers: Option<&Answers>, quiz: &Quiz) -> Option<ValidateError> {
        scoring::validate_answers(answers, quiz)
    }

    /// Compute the result shown to the user.
    fn get_result(&self, answers: &Answers, quiz: &Quiz) -> Option<QuizResult> {
        Some(scoring::get_result(answers, quiz))
    }
}

/// The built-in scoring engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMethods;

impl QuizMethods for DefaultMethods {
    fn name(&self) -> &str {
        "default"
    }
}

// ---------------------------------------------------------------------------
// Two-axis personality plane
// ---------------------------------------------------------------------------

/// Quadrant captions, counter-clockwise from the top right.
pub const QUADRANT_LABELS: [&str; 4] = ["暴躁", "憂鬱", "冷靜", "熱情"];

/// Splits contributions across the `x` and `y` axes by each question's
/// `target`, producing a point on the personality plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisMethods;

impl AxisMethods {
    /// Per-axis sums for a submission. Questions without an `x`/`y` target
    /// count toward neither axis.
    pub fn axis_scores(answers: &[(String, String)], quiz: &Quiz) -> (f64, f64) {
        let mut x = 0.0;
        let mut y = 0.0;
        for (key, value) in answers {
            let Some((question, contribution)) = scoring::resolve_contribution(quiz, key, value)
            else {
                continue;
            };
            match question.target.as_deref() {
                Some("x") => x += contribution,
                Some("y") => y += contribution,
                _ => {}
            }
        }
        (x, y)
    }

    /// Quadrant caption for a point; points on an axis fall to the
    /// non-negative side.
    pub fn quadrant_label(x: f64, y: f64) -> &'static str {
        match (x >= 0.0, y >= 0.0) {
            (true, true) => QUADRANT_LABELS[0],
            (false, true) => QUADRANT_LABELS[1],
            (false, false) => QUADRANT_LABELS[2],
            (true, false) => QUADRANT_LABELS[3],
        }
    }
}

impl QuizMethods for AxisMethods {
    fn name(&self) -> &str {
        "axes"
    }

    fn get_result(&self, answers: &Answers, quiz: &Quiz) -> Option<QuizResult> {
        let score = scoring::get_score(answers, quiz);
        let (x, y) = Self::axis_scores(answers, quiz);
        let label = Self::quadrant_label(x, y);
        Some(
            QuizResult::new()
                .with("score", score)
                .with("x", x)
                .with("y", y)
                .with("label", label)
                .with("text", format!("你的座標是 ({x},{y})，屬於「{label}」")),
        )
    }
}

/// Look up a strategy by the name used in quiz definition files.
pub fn methods_by_name(name: &str) -> Result<Arc<dyn QuizMethods>, QuizError> {
    match name {
        "default" => Ok(Arc::new(DefaultMethods)),
        "axes" => Ok(Arc::new(AxisMethods)),
        other => Err(QuizError::UnknownMethods(other.to_string())),
    }
}
