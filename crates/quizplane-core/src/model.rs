//! Core data model types for quizplane.
//!
//! Quizzes, questions and options are static for the lifetime of a page;
//! answers are created per submission and discarded once a result exists.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::traits::{DefaultMethods, QuizMethods};

/// A selectable answer choice.
///
/// Named `QuizOption` so it does not shadow `std::option::Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Caption shown next to the control.
    pub text: String,
    /// Identifier submitted by the form.
    pub value: String,
    /// Contribution to the total when selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl QuizOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable ordinal used as the form control name.
    pub index: u32,
    /// Question text.
    pub text: String,
    /// Overrides the quiz's default option set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuizOption>>,
    /// Submitted value to contribution; wins over per-option scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<BTreeMap<String, f64>>,
    /// Plane axis this question contributes to (`x` or `y`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Question {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            options: None,
            scores: None,
            target: None,
        }
    }

    pub fn with_options(mut self, options: Vec<QuizOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_scores<I, K>(mut self, scores: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.scores = Some(scores.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// A quiz definition: ordered questions, shared default options, and the
/// strategy used to extract, validate and score answers.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub default_options: Vec<QuizOption>,
    #[serde(skip)]
    methods: Option<Arc<dyn QuizMethods>>,
}

impl fmt::Debug for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quiz")
            .field("questions", &self.questions)
            .field("default_options", &self.default_options)
            .field("methods", &self.methods().name())
            .finish()
    }
}

impl Quiz {
    pub fn new(questions: Vec<Question>, default_options: Vec<QuizOption>) -> Self {
        Self {
            questions,
            default_options,
            methods: None,
        }
    }

    /// Replace the answer-handling strategy.
    pub fn with_methods(mut self, methods: Arc<dyn QuizMethods>) -> Self {
        self.methods = Some(methods);
        self
    }

    /// The configured strategy, or the built-in one when none was set.
    pub fn methods(&self) -> &dyn QuizMethods {
        match &self.methods {
            Some(methods) => methods.as_ref(),
            None => &DefaultMethods,
        }
    }

    /// First question whose `index` equals `index`.
    pub fn question(&self, index: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.index == index)
    }

    /// Check that every question can resolve an option set.
    pub fn check_invariants(&self) -> Result<(), QuizError> {
        if !self.default_options.is_empty() {
            return Ok(());
        }
        match self.questions.iter().find(|q| q.options.is_none()) {
            Some(q) => Err(QuizError::MissingOptions { index: q.index }),
            None => Ok(()),
        }
    }

    pub fn get_answers(&self, form: Option<&crate::form::Form>) -> Option<Answers> {
        self.methods().get_answers(form)
    }

    pub fn validate_answers(&self, answers: Option<&Answers>) -> Option<ValidateError> {
        self.methods().validate_answers(answers, self)
    }

    pub fn get_result(&self, answers: &Answers) -> Option<QuizResult> {
        self.methods().get_result(answers, self)
    }
}

/// Submitted `(question index, value)` pairs in form order.
pub type Answers = Vec<(String, String)>;

/// Human-readable validation failure.
pub type ValidateError = String;

/// A single value in a [`QuizResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl ResultValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(n) => Some(*n),
            ResultValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Text(s) => Some(s),
            ResultValue::Number(_) => None,
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => write!(f, "{n}"),
            ResultValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ResultValue {
    fn from(n: f64) -> Self {
        ResultValue::Number(n)
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::Text(s)
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        ResultValue::Text(s.to_string())
    }
}

/// Open mapping of result fields.
///
/// Recognized keys are `score`, `label`, `text` and `html`; strategies may
/// add their own (the axis strategy adds `x` and `y`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizResult(BTreeMap<String, ResultValue>);

impl QuizResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ResultValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ResultValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ResultValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ResultValue::as_number)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ResultValue::as_text)
    }

    pub fn score(&self) -> Option<f64> {
        self.number("score")
    }

    pub fn label(&self) -> Option<&str> {
        self.string("label")
    }

    pub fn text(&self) -> Option<&str> {
        self.string("text")
    }

    pub fn html(&self) -> Option<&str> {
        self.string("html")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResultValue)> {
        self.0.iter()
    }
}

/// Descriptive fields for one episode, used only for site assembly.
///
/// Keys beyond the known ones are kept in `extra` and passed through to the
/// generated data module and the page template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizMeta {
    pub episode: String,
    #[serde(default, rename = "episodeTitle", alias = "episode_title")]
    pub episode_title: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_requires_options_somewhere() {
        let quiz = Quiz::new(vec![Question::new(0, "Q")], vec![]);
        assert!(matches!(
            quiz.check_invariants(),
            Err(QuizError::MissingOptions { index: 0 })
        ));

        let quiz = Quiz::new(
            vec![Question::new(0, "Q")],
            vec![QuizOption::new("Yes", "y")],
        );
        assert!(quiz.check_invariants().is_ok());

        let quiz = Quiz::new(
            vec![Question::new(0, "Q").with_options(vec![QuizOption::new("Yes", "y")])],
            vec![],
        );
        assert!(quiz.check_invariants().is_ok());
    }

    #[test]
    fn quiz_defaults_to_builtin_methods() {
        let quiz = Quiz::default();
        assert_eq!(quiz.methods().name(), "default");
    }

    #[test]
    fn quiz_result_accessors() {
        let result = QuizResult::new()
            .with("score", 5.0)
            .with("text", "hello")
            .with("label", "calm");
        assert_eq!(result.score(), Some(5.0));
        assert_eq!(result.text(), Some("hello"));
        assert_eq!(result.label(), Some("calm"));
        assert_eq!(result.html(), None);
        assert_eq!(result.number("text"), None);
    }

    #[test]
    fn quiz_result_serializes_as_flat_object() {
        let result = QuizResult::new().with("score", 5.0).with("text", "ok");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "score": 5.0, "text": "ok" }));
    }

    #[test]
    fn meta_accepts_both_title_spellings_and_keeps_extras() {
        let meta: QuizMeta = toml::from_str(
            r#"
episode = "EP01"
episode_title = "Pilot"
title = "Who are you"
cover = "cover.png"
"#,
        )
        .unwrap();
        assert_eq!(meta.episode_title, "Pilot");
        assert_eq!(meta.extra.get("cover").and_then(|v| v.as_str()), Some("cover.png"));

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["episodeTitle"], "Pilot");
        assert_eq!(json["cover"], "cover.png");
    }
}
