//! The `quizplane collect` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizplane_site::{build_inputs, get_quizzes_details, write_data_module};

use crate::config::QuizplaneConfig;

pub async fn execute(
    quizzes_dir: Option<PathBuf>,
    output_file: Option<PathBuf>,
    inputs: Option<PathBuf>,
    config: &QuizplaneConfig,
) -> Result<()> {
    let quizzes_dir = quizzes_dir.unwrap_or_else(|| config.quizzes_dir.clone());
    let output_file = output_file
        .or_else(|| config.data_module.clone())
        .context("no output file given and no data_module configured")?;

    let quizzes = get_quizzes_details(&quizzes_dir, &config.episode_prefix).await?;
    write_data_module(&quizzes, &output_file)?;
    println!(
        "Found {} quizs and wrote to {}",
        quizzes.len(),
        output_file.display()
    );

    if let Some(inputs_path) = inputs {
        let map = build_inputs(&quizzes, &quizzes_dir.to_string_lossy());
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(&inputs_path, json)
            .with_context(|| format!("failed to write inputs to {}", inputs_path.display()))?;
        println!("Wrote {} page inputs to {}", map.len(), inputs_path.display());
    }

    Ok(())
}
