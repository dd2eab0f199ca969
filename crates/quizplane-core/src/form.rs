//! Form contract between generated pages and the scoring runtime.
//!
//! Controls are named after the question index and carry the option value.
//! [`form_deserialize`] and [`autofill`] are developer tooling for filling
//! a form from saved data or at random.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuizError;
use crate::model::{Answers, Quiz};
use crate::scoring::question_options;

/// Kind of form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Radio,
    Checkbox,
    Text,
    Select,
    Hidden,
}

/// A single editable control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ControlKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl FormControl {
    fn named(kind: ControlKind, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            value: value.into(),
            checked: false,
            disabled: false,
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::named(ControlKind::Radio, name, value)
    }

    pub fn checkbox(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::named(ControlKind::Checkbox, name, value)
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::named(ControlKind::Text, name, value)
    }

    /// Whether the control contributes an entry on submission.
    fn is_submitted(&self) -> bool {
        if self.disabled || self.name.as_deref().map_or(true, str::is_empty) {
            return false;
        }
        match self.kind {
            ControlKind::Radio | ControlKind::Checkbox => self.checked,
            _ => true,
        }
    }
}

/// An ordered collection of controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub controls: Vec<FormControl>,
}

impl Form {
    pub fn new(controls: Vec<FormControl>) -> Self {
        Self { controls }
    }

    /// One radio group per question, one radio per resolved option.
    pub fn for_quiz(quiz: &Quiz) -> Self {
        let controls = quiz
            .questions
            .iter()
            .flat_map(|q| {
                question_options(quiz, q)
                    .iter()
                    .map(move |o| FormControl::radio(q.index.to_string(), o.value.clone()))
            })
            .collect();
        Self { controls }
    }

    /// Submitted `(name, value)` pairs in document order.
    pub fn entries(&self) -> Answers {
        self.controls
            .iter()
            .filter(|c| c.is_submitted())
            .filter_map(|c| c.name.clone().map(|name| (name, c.value.clone())))
            .collect()
    }

    /// Candidate values for every control name, in first-seen order.
    pub fn value_groups(&self) -> Vec<(String, Vec<String>)> {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for control in &self.controls {
            let Some(name) = control.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            match groups.iter_mut().find(|(n, _)| n.as_str() == name) {
                Some((_, values)) => values.push(control.value.clone()),
                None => groups.push((name.to_string(), vec![control.value.clone()])),
            }
        }
        groups
    }
}

/// Decode saved form data: a JSON object, or URL-encoded `name=value` pairs
/// joined by `&`. Entries keep their order of appearance.
pub fn parse_form_data(data: &str) -> Result<Vec<(String, Value)>, QuizError> {
    let trimmed = data.trim();
    if trimmed.starts_with('{') {
        let map: serde_json::Map<String, Value> = serde_json::from_str(trimmed)
            .map_err(|e| QuizError::InvalidFormData(e.to_string()))?;
        return Ok(map.into_iter().collect());
    }
    trimmed
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            if !pair.contains('=') {
                return Err(QuizError::InvalidFormData(format!("missing '=' in {pair:?}")));
            }
            let (name, value) = form_urlencoded::parse(pair.as_bytes())
                .next()
                .ok_or_else(|| QuizError::InvalidFormData(format!("empty pair {pair:?}")))?;
            Ok((name.into_owned(), Value::String(value.into_owned())))
        })
        .collect()
}

/// Populate a form from `(name, value)` data.
///
/// Checkboxes take the truthiness of the value; a radio group checks the
/// radio whose value matches; other controls receive the value as text.
pub fn form_deserialize<I>(form: &mut Form, data: I) -> Result<(), QuizError>
where
    I: IntoIterator<Item = (String, Value)>,
{
    for (name, value) in data {
        let mut targets: Vec<&mut FormControl> = form
            .controls
            .iter_mut()
            .filter(|c| c.name.as_deref() == Some(name.as_str()))
            .collect();
        let Some(first_kind) = targets.first().map(|c| c.kind) else {
            return Err(QuizError::UnknownControl(name));
        };

        match first_kind {
            ControlKind::Checkbox => {
                let checked = is_truthy(&value);
                for control in targets {
                    control.checked = checked;
                }
            }
            ControlKind::Radio => {
                let wanted = value_to_string(&value);
                if targets.iter().any(|c| c.value == wanted) {
                    for control in targets.iter_mut() {
                        control.checked = control.value == wanted;
                    }
                }
            }
            _ => {
                let text = value_to_string(&value);
                for control in targets {
                    control.value = text.clone();
                }
            }
        }
    }
    Ok(())
}

/// Pick a random candidate value for every control group and apply it.
pub fn autofill<R: Rng + ?Sized>(form: &mut Form, rng: &mut R) -> Result<(), QuizError> {
    let picks: Vec<(String, Value)> = form
        .value_groups()
        .into_iter()
        .filter_map(|(name, values)| {
            values
                .choose(&mut *rng)
                .map(|v| (name, Value::String(v.clone())))
        })
        .collect();
    tracing::debug!(groups = picks.len(), "autofilling form");
    form_deserialize(form, picks)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuizOption};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiz() -> Quiz {
        Quiz::new(
            vec![
                Question::new(0, "Q1"),
                Question::new(1, "Q2").with_options(vec![QuizOption::new("Only", "only")]),
            ],
            vec![QuizOption::new("Yes", "y"), QuizOption::new("No", "n")],
        )
    }

    #[test]
    fn for_quiz_builds_radio_groups() {
        let form = Form::for_quiz(&quiz());
        assert_eq!(form.controls.len(), 3);
        assert!(form.controls.iter().all(|c| c.kind == ControlKind::Radio));
        assert_eq!(
            form.value_groups(),
            vec![
                ("0".to_string(), vec!["y".to_string(), "n".to_string()]),
                ("1".to_string(), vec!["only".to_string()]),
            ]
        );
        assert!(form.entries().is_empty());
    }

    #[test]
    fn entries_skip_unnamed_disabled_and_unchecked() {
        let mut disabled = FormControl::text("d", "x");
        disabled.disabled = true;
        let unnamed = FormControl {
            name: None,
            kind: ControlKind::Text,
            value: "v".into(),
            checked: false,
            disabled: false,
        };
        let mut checked_box = FormControl::checkbox("agree", "on");
        checked_box.checked = true;
        let form = Form::new(vec![
            disabled,
            unnamed,
            FormControl::checkbox("other", "on"),
            checked_box,
            FormControl::text("name", "Ann"),
        ]);
        assert_eq!(
            form.entries(),
            vec![
                ("agree".to_string(), "on".to_string()),
                ("name".to_string(), "Ann".to_string()),
            ]
        );
    }

    #[test]
    fn deserialize_json_into_form() {
        let mut form = Form::for_quiz(&quiz());
        form.controls.push(FormControl::checkbox("consent", "on"));
        form.controls.push(FormControl::text("nickname", ""));

        let data =
            parse_form_data(r#"{"0": "n", "1": "only", "consent": 1, "nickname": "kiki"}"#).unwrap();
        form_deserialize(&mut form, data).unwrap();

        assert_eq!(
            form.entries(),
            vec![
                ("0".to_string(), "n".to_string()),
                ("1".to_string(), "only".to_string()),
                ("consent".to_string(), "on".to_string()),
                ("nickname".to_string(), "kiki".to_string()),
            ]
        );
    }

    #[test]
    fn checkbox_falsy_values_uncheck() {
        let mut form = Form::new(vec![FormControl::checkbox("c", "on")]);
        form_deserialize(&mut form, [("c".to_string(), Value::Bool(true))]).unwrap();
        assert!(form.controls[0].checked);
        form_deserialize(&mut form, [("c".to_string(), Value::String(String::new()))]).unwrap();
        assert!(!form.controls[0].checked);
    }

    #[test]
    fn radio_with_unknown_value_keeps_selection() {
        let mut form = Form::for_quiz(&quiz());
        form_deserialize(&mut form, [("0".to_string(), Value::from("y"))]).unwrap();
        form_deserialize(&mut form, [("0".to_string(), Value::from("maybe"))]).unwrap();
        assert_eq!(form.entries(), vec![("0".to_string(), "y".to_string())]);
    }

    #[test]
    fn deserialize_unknown_control_errors() {
        let mut form = Form::for_quiz(&quiz());
        let err = form_deserialize(&mut form, [("42".to_string(), Value::from("y"))]).unwrap_err();
        assert!(matches!(err, QuizError::UnknownControl(name) if name == "42"));
    }

    #[test]
    fn parse_pair_form_data() {
        let data = parse_form_data("0=y&1=only").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1], ("1".to_string(), Value::from("only")));
        assert!(parse_form_data("0").is_err());
        assert!(parse_form_data("{not json").is_err());
    }

    #[test]
    fn pair_form_data_is_url_decoded() {
        let data = parse_form_data("note=hello+there&2=%E5%90%8C%E6%84%8F&x%26y=a%3Db").unwrap();
        assert_eq!(data[0], ("note".to_string(), Value::from("hello there")));
        assert_eq!(data[1], ("2".to_string(), Value::from("同意")));
        assert_eq!(data[2], ("x&y".to_string(), Value::from("a=b")));
    }

    #[test]
    fn json_form_data_keeps_key_order() {
        let data = parse_form_data(r#"{"2": "b", "10": "c", "1": "a"}"#).unwrap();
        let names: Vec<&str> = data.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["2", "10", "1"]);
    }

    #[test]
    fn autofill_answers_every_question() {
        let quiz = quiz();
        let mut form = Form::for_quiz(&quiz);
        let mut rng = StdRng::seed_from_u64(7);
        autofill(&mut form, &mut rng).unwrap();

        let answers = quiz.get_answers(Some(&form)).unwrap();
        assert_eq!(answers.len(), 2);
        assert!(quiz.validate_answers(Some(&answers)).is_none());
        assert_eq!(answers[1], ("1".to_string(), "only".to_string()));
    }
}
