//! quizplane-core: Quiz data model, scoring engine, and form contract.
//!
//! This crate defines the quiz types, the built-in scoring functions and the
//! strategy trait that lets a quiz replace them, plus TOML loading.

pub mod error;
pub mod form;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod traits;

pub use error::QuizError;
pub use form::{Form, FormControl};
pub use model::{Answers, Question, Quiz, QuizMeta, QuizOption, QuizResult, ResultValue};
pub use traits::{AxisMethods, DefaultMethods, QuizMethods};
