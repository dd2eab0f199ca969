//! The `quizplane validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizplane_core::parser::{self, META_FILE, QUIZ_FILE};
use quizplane_site::list_quizzes;

use crate::config::QuizplaneConfig;

pub fn execute(quizzes_dir: Option<PathBuf>, config: &QuizplaneConfig) -> Result<()> {
    let quizzes_dir = quizzes_dir.unwrap_or_else(|| config.quizzes_dir.clone());
    let keys = list_quizzes(&quizzes_dir, &config.episode_prefix)?;

    let mut table = Table::new();
    table.set_header(vec!["Episode", "Title", "Questions", "Methods", "Warnings"]);

    let mut total_warnings = 0;
    let mut failed = 0;

    for key in &keys {
        let dir = quizzes_dir.join(key);

        let title = match parser::parse_meta(&dir.join(META_FILE)) {
            Ok(meta) => meta.title,
            Err(e) => {
                println!("  [{key}] ERROR: {e:#}");
                failed += 1;
                continue;
            }
        };

        let quiz_path = dir.join(QUIZ_FILE);
        if !quiz_path.exists() {
            table.add_row(vec![
                Cell::new(key),
                Cell::new(&title),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(0),
            ]);
            continue;
        }

        let quiz = match parser::parse_quiz(&quiz_path) {
            Ok(quiz) => quiz,
            Err(e) => {
                println!("  [{key}] ERROR: {e:#}");
                failed += 1;
                continue;
            }
        };

        let warnings = parser::validate_quiz(&quiz);
        for w in &warnings {
            let prefix = w
                .question
                .map(|index| format!("  [{key}#{index}]"))
                .unwrap_or_else(|| format!("  [{key}]"));
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();

        table.add_row(vec![
            Cell::new(key),
            Cell::new(&title),
            Cell::new(quiz.questions.len()),
            Cell::new(quiz.methods().name()),
            Cell::new(warnings.len()),
        ]);
    }

    println!("{table}");

    if failed > 0 {
        anyhow::bail!("{failed} of {} episode(s) failed validation", keys.len());
    }
    if total_warnings == 0 {
        println!("All quizzes valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
