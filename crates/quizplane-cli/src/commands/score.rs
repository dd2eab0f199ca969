//! The `quizplane score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizplane_core::form::{autofill, form_deserialize, parse_form_data};
use quizplane_core::parser::parse_quiz;
use quizplane_core::Form;
use quizplane_plane::{write_svg, PlanePoint};

use crate::config::QuizplaneConfig;

/// Inline answer data, or the contents of the file it names.
fn read_answers(answers: &str) -> Result<String> {
    let path = Path::new(answers);
    if path.is_file() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answers: {}", path.display()))
    } else {
        Ok(answers.to_string())
    }
}

pub fn execute(
    quiz_path: PathBuf,
    answers: Option<String>,
    fill_randomly: bool,
    seed: Option<u64>,
    plane: Option<PathBuf>,
    config: &QuizplaneConfig,
) -> Result<()> {
    let quiz = parse_quiz(&quiz_path)?;
    let mut form = Form::for_quiz(&quiz);

    if fill_randomly {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        autofill(&mut form, &mut rng)?;
    } else if let Some(answers) = answers {
        let data = parse_form_data(&read_answers(&answers)?)?;
        form_deserialize(&mut form, data)?;
    }

    let answers = quiz.get_answers(Some(&form));
    if let Some(message) = quiz.validate_answers(answers.as_ref()) {
        anyhow::bail!("{message}");
    }
    let answers = answers.unwrap_or_default();

    let result = quiz
        .get_result(&answers)
        .context("quiz produced no result")?;
    tracing::debug!(answers = answers.len(), "scored submission");
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(svg_path) = plane {
        match PlanePoint::from_result(&result) {
            Some(point) => {
                write_svg(&[point], &config.plane, &svg_path)?;
                eprintln!("Wrote plane to {}", svg_path.display());
            }
            None => tracing::warn!("result has no x/y coordinates, skipping plane"),
        }
    }

    Ok(())
}
