//! Quiz error types.
//!
//! Scoring itself never fails: missing questions, options and answers all
//! degrade to zero or empty. These errors cover quiz definitions that break
//! the data model invariants and developer tooling that drives forms.

use thiserror::Error;

/// Errors raised while loading quiz definitions or populating forms.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A question has no options of its own and the quiz has no defaults.
    #[error("question {index} has no options and the quiz defines no default options")]
    MissingOptions { index: u32 },

    /// The `methods` field named a strategy that does not exist.
    #[error("unknown quiz methods: {0} (expected \"default\" or \"axes\")")]
    UnknownMethods(String),

    /// Form data referenced a control name the form does not contain.
    #[error("form has no control named {0:?}")]
    UnknownControl(String),

    /// Form data could not be decoded.
    #[error("invalid form data: {0}")]
    InvalidFormData(String),
}
