//! TOML quiz definition parser.
//!
//! Loads `quiz.toml` and `meta.toml` files from an episode directory, and
//! validates quiz definitions.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, Quiz, QuizMeta, QuizOption};
use crate::traits::methods_by_name;

/// File name of the quiz definition inside an episode directory.
pub const QUIZ_FILE: &str = "quiz.toml";

/// File name of the episode metadata inside an episode directory.
pub const META_FILE: &str = "meta.toml";

/// Intermediate TOML structure for quiz definition files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    #[serde(default = "default_methods")]
    methods: String,
    #[serde(default)]
    default_options: Vec<QuizOption>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

fn default_methods() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    index: Option<u32>,
    text: String,
    #[serde(default)]
    options: Option<Vec<QuizOption>>,
    #[serde(default)]
    scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    target: Option<String>,
}

/// Parse a quiz definition file.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a quiz definition from a TOML string (useful for testing).
///
/// A question without an explicit `index` takes its position in the file.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let methods = methods_by_name(&parsed.methods)
        .with_context(|| format!("invalid quiz file: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(position, q)| Question {
            index: q.index.unwrap_or(position as u32),
            text: q.text,
            options: q.options,
            scores: q.scores,
            target: q.target,
        })
        .collect();

    let quiz = Quiz::new(questions, parsed.default_options).with_methods(methods);
    quiz.check_invariants()
        .with_context(|| format!("invalid quiz file: {}", source_path.display()))?;

    tracing::debug!(
        path = %source_path.display(),
        questions = quiz.questions.len(),
        methods = quiz.methods().name(),
        "parsed quiz"
    );
    Ok(quiz)
}

/// Parse an episode metadata file.
pub fn parse_meta(path: &Path) -> Result<QuizMeta> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata file: {}", path.display()))?;

    parse_meta_str(&content, path)
}

/// Parse episode metadata from a TOML string.
pub fn parse_meta_str(content: &str, source_path: &Path) -> Result<QuizMeta> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question index (if applicable).
    pub question: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for issues that parse but would score surprisingly.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "quiz has no questions".into(),
        });
    }

    // Duplicate indices: only the first question with an index is ever scored
    let mut seen = HashSet::new();
    for q in &quiz.questions {
        if !seen.insert(q.index) {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: format!("duplicate question index: {}", q.index),
            });
        }
    }

    // Index vs position: option lookup by position would disagree
    for (position, q) in quiz.questions.iter().enumerate() {
        if q.index as usize != position {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: format!("index {} does not match position {position}", q.index),
            });
        }
    }

    for q in &quiz.questions {
        if q.options.as_ref().is_some_and(|o| o.is_empty()) {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: "options list is empty".into(),
            });
        }
    }

    // Score keys that no option could ever submit
    for q in &quiz.questions {
        let Some(scores) = &q.scores else { continue };
        let options = crate::scoring::question_options(quiz, q);
        for key in scores.keys() {
            if !options.iter().any(|o| &o.value == key) {
                warnings.push(ValidationWarning {
                    question: Some(q.index),
                    message: format!("scores key {key:?} matches no option value"),
                });
            }
        }
    }

    if quiz.methods().name() == "axes" {
        for q in &quiz.questions {
            if !matches!(q.target.as_deref(), Some("x") | Some("y")) {
                warnings.push(ValidationWarning {
                    question: Some(q.index),
                    message: "axes quiz question has no x/y target".into(),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
methods = "axes"

[[default_options]]
text = "同意"
value = "agree"
score = 2

[[default_options]]
text = "不同意"
value = "disagree"
score = -2

[[questions]]
index = 0
text = "我喜歡參加派對"
target = "x"

[[questions]]
index = 1
text = "我常常擔心"
target = "y"

[questions.scores]
agree = 3
disagree = -1
"#;

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.default_options.len(), 2);
        assert_eq!(quiz.methods().name(), "axes");
        assert_eq!(quiz.questions[1].scores.as_ref().unwrap()["agree"], 3.0);
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn parse_fills_missing_indices_and_methods() {
        let toml = r#"
[[questions]]
text = "First"
options = [{ text = "A", value = "a", score = 1 }]

[[questions]]
text = "Second"
options = [{ text = "B", value = "b" }]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.questions[0].index, 0);
        assert_eq!(quiz.questions[1].index, 1);
        assert_eq!(quiz.methods().name(), "default");
        assert_eq!(quiz.questions[1].options.as_ref().unwrap()[0].score, None);
    }

    #[test]
    fn parse_rejects_missing_options() {
        let toml = r#"
[[questions]]
text = "No options anywhere"
"#;
        let err = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("no options"));
    }

    #[test]
    fn parse_rejects_unknown_methods() {
        let toml = r#"
methods = "magic"
[[default_options]]
text = "A"
value = "a"
"#;
        assert!(parse_quiz_str(toml, &PathBuf::from("quiz.toml")).is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_quiz_str(bad, &PathBuf::from("bad.toml")).is_err());
        assert!(parse_meta_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_meta_requires_title() {
        let err = parse_meta_str("episode = \"EP01\"", &PathBuf::from("meta.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("meta.toml"));
    }

    #[test]
    fn validate_reports_duplicates_and_stray_scores() {
        let toml = r#"
[[default_options]]
text = "A"
value = "a"

[[questions]]
index = 0
text = "One"
scores = { a = 1, z = 9 }

[[questions]]
index = 0
text = "Again"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("\"z\"")));
        assert!(warnings.iter().any(|w| w.message.contains("position 1")));
    }

    #[test]
    fn validate_axes_targets() {
        let toml = r#"
methods = "axes"
[[default_options]]
text = "A"
value = "a"
[[questions]]
text = "Untargeted"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        assert!(validate_quiz(&quiz)
            .iter()
            .any(|w| w.message.contains("x/y target")));
    }

    #[test]
    fn load_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(QUIZ_FILE), VALID_TOML).unwrap();
        std::fs::write(
            dir.path().join(META_FILE),
            "episode = \"EP01\"\ntitle = \"Plane\"\n",
        )
        .unwrap();

        let quiz = parse_quiz(&dir.path().join(QUIZ_FILE)).unwrap();
        assert_eq!(quiz.questions.len(), 2);
        let meta = parse_meta(&dir.path().join(META_FILE)).unwrap();
        assert_eq!(meta.title, "Plane");
        assert!(parse_meta(&dir.path().join("missing.toml")).is_err());
    }
}
