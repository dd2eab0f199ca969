//! Static page generation.
//!
//! Every episode directory gets an `index.html` rendered from the shared
//! template. The template sees the episode metadata, its link and, when the
//! episode has a `quiz.toml`, the question form as `questions_html`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizplane_core::parser::{parse_quiz_str, QUIZ_FILE};
use quizplane_core::scoring::question_options;
use quizplane_core::Quiz;

use crate::discover::{get_quizzes_details, QuizSummary};
use crate::template::{html_escape, Template};

/// Name of the file written into each episode directory.
pub const PAGE_FILE: &str = "index.html";

/// A page written by [`generate_pages`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub key: String,
    pub path: PathBuf,
}

/// Template variables for one episode. `key` and `quiz_dir` are left out.
pub fn template_context(summary: &QuizSummary) -> BTreeMap<String, String> {
    let meta = &summary.meta;
    let mut ctx = BTreeMap::new();

    for (key, value) in &meta.extra {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        ctx.insert(key.clone(), rendered);
    }

    ctx.insert("episode".into(), meta.episode.clone());
    ctx.insert("episodeTitle".into(), meta.episode_title.clone());
    ctx.insert("episode_title".into(), meta.episode_title.clone());
    ctx.insert("title".into(), meta.title.clone());
    ctx.insert("author".into(), meta.author.clone());
    ctx.insert("description".into(), meta.description.clone());
    ctx.insert("link".into(), summary.link.clone());
    ctx
}

/// Radio-button form fragment for a quiz. Each question's inputs share the
/// question index as their `name`.
pub fn render_questions_html(quiz: &Quiz) -> String {
    let mut out = String::from("<ol class=\"questions\">\n");
    for question in &quiz.questions {
        let _ = writeln!(
            out,
            "<li class=\"question\" data-index=\"{}\">\n<p class=\"question-text\">{}</p>",
            question.index,
            html_escape(&question.text)
        );
        for option in question_options(quiz, question) {
            let _ = writeln!(
                out,
                "<label><input type=\"radio\" name=\"{}\" value=\"{}\"> {}</label>",
                question.index,
                html_escape(&option.value),
                html_escape(&option.text)
            );
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ol>");
    out
}

async fn load_quiz(quiz_dir: &Path) -> Result<Option<Quiz>> {
    let path = quiz_dir.join(QUIZ_FILE);
    let exists = tokio::fs::try_exists(&path)
        .await
        .with_context(|| format!("failed to check quiz file: {}", path.display()))?;
    if !exists {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content, &path).map(Some)
}

/// Render one episode's page without writing it.
pub async fn render_page(template: &Template, summary: &QuizSummary) -> Result<String> {
    let mut ctx = template_context(summary);
    if let Some(quiz) = load_quiz(&summary.quiz_dir).await? {
        ctx.insert("questions_html".into(), render_questions_html(&quiz));
    }
    Ok(template.render(&ctx))
}

/// Render the template for every episode under `quizzes_dir` and write
/// `index.html` into each episode directory. Nothing is written unless
/// every page renders.
pub async fn generate_pages(
    template_path: &Path,
    quizzes_dir: &Path,
    prefix: &str,
) -> Result<Vec<GeneratedPage>> {
    let template = Template::from_file(template_path)?;
    let summaries = get_quizzes_details(quizzes_dir, prefix).await?;

    let mut rendered = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        rendered.push((summary, render_page(&template, summary).await?));
    }

    let mut pages = Vec::with_capacity(rendered.len());
    for (summary, html) in rendered {
        let path = summary.quiz_dir.join(PAGE_FILE);
        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("failed to write page: {}", path.display()))?;
        tracing::info!(key = %summary.key, path = %path.display(), "generated page");
        pages.push(GeneratedPage {
            key: summary.key.clone(),
            path,
        });
    }

    Ok(pages)
}
