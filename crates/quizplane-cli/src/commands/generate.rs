//! The `quizplane generate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizplane_site::generate_pages;

use crate::config::QuizplaneConfig;

pub async fn execute(
    template: Option<PathBuf>,
    quizzes_dir: Option<PathBuf>,
    config: &QuizplaneConfig,
) -> Result<()> {
    let template = template.unwrap_or_else(|| config.template.clone());
    let quizzes_dir = quizzes_dir.unwrap_or_else(|| config.quizzes_dir.clone());

    let pages = generate_pages(&template, &quizzes_dir, &config.episode_prefix).await?;
    for page in &pages {
        println!("  {} -> {}", page.key, page.path.display());
    }
    println!("Generated {} page(s) from {}", pages.len(), template.display());

    Ok(())
}
