//! The built-in scoring engine.
//!
//! Every function here fails open: an absent form, question, option or
//! answer resolves to `None`, an empty slice, or a zero contribution.

use crate::form::Form;
use crate::model::{Answers, Question, Quiz, QuizOption, QuizResult, ValidateError};

/// Message returned when fewer answers than questions were submitted.
pub const UNANSWERED_MESSAGE: &str = "尚有題目未作答";

/// Options for the question at position `index`.
///
/// Returns the question's own options, else the quiz defaults; an
/// out-of-range `index` yields an empty slice.
pub fn get_question_options(quiz: &Quiz, index: usize) -> &[QuizOption] {
    match quiz.questions.get(index) {
        Some(question) => question_options(quiz, question),
        None => &[],
    }
}

/// Options that apply to `question` within `quiz`.
pub fn question_options<'q>(quiz: &'q Quiz, question: &'q Question) -> &'q [QuizOption] {
    question.options.as_deref().unwrap_or(&quiz.default_options)
}

/// Extract `(name, value)` pairs from a form, or `None` without one.
pub fn get_answers(form: Option<&Form>) -> Option<Answers> {
    form.map(Form::entries)
}

/// Count-only completeness check.
///
/// A submission passes when it carries at least as many pairs as the quiz
/// has questions, regardless of which indices those pairs name.
pub fn validate_answers(answers: Option<&Answers>, quiz: &Quiz) -> Option<ValidateError> {
    match answers {
        Some(a) if a.len() >= quiz.questions.len() => None,
        _ => Some(UNANSWERED_MESSAGE.to_string()),
    }
}

/// Total score of a submission.
pub fn get_score(answers: &[(String, String)], quiz: &Quiz) -> f64 {
    answers
        .iter()
        .filter_map(|(key, value)| resolve_contribution(quiz, key, value))
        .fold(0.0, |total, (_, contribution)| total + contribution)
}

/// Default result: the score and a sentence quoting it.
pub fn get_result(answers: &[(String, String)], quiz: &Quiz) -> QuizResult {
    let score = get_score(answers, quiz);
    QuizResult::new()
        .with("score", score)
        .with("text", format!("你的總分是 {score} 分"))
}

/// Resolve one submitted pair to its question and contribution.
///
/// A value listed in the question's `scores` map takes that score;
/// otherwise the value is matched against the question's option set. Returns `None` when no
/// question has the key's index.
pub fn resolve_contribution<'q>(
    quiz: &'q Quiz,
    key: &str,
    value: &str,
) -> Option<(&'q Question, f64)> {
    let index = parse_index(key)?;
    let question = quiz.questions.iter().find(|q| f64::from(q.index) == index)?;

    if let Some(score) = question.scores.as_ref().and_then(|s| s.get(value)) {
        return Some((question, *score));
    }

    let contribution = question_options(quiz, question)
        .iter()
        .find(|o| o.value == value)
        .and_then(|o| o.score)
        .unwrap_or(0.0);
    Some((question, contribution))
}

/// Numeric reading of a form control name. Blank names match nothing.
fn parse_index(key: &str) -> Option<f64> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
