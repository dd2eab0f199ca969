//! Episode discovery and the generated quiz data module.
//!
//! Episode directories are direct children of the quizzes root whose names
//! start with a fixed prefix. Each one carries a `meta.toml`; all metadata
//! files are loaded concurrently and a single failure aborts the batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use quizplane_core::model::QuizMeta;
use quizplane_core::parser::{parse_meta_str, META_FILE};

/// Directory-name prefix identifying episode folders.
pub const DEFAULT_EPISODE_PREFIX: &str = "ep";

/// Summary fields owned by discovery; metadata keys with these names are
/// dropped.
pub const RESERVED_KEYS: [&str; 3] = ["key", "quizDir", "link"];

/// One discovered episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    /// Directory name; also the page name.
    pub key: String,
    /// Absolute or root-relative episode directory.
    #[serde(rename = "quizDir")]
    pub quiz_dir: PathBuf,
    /// Link relative to the quizzes index page.
    pub link: String,
    #[serde(flatten)]
    pub meta: QuizMeta,
}

/// Names of episode directories under `dir`, sorted.
pub fn list_quizzes(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut keys = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("skipping non-UTF-8 entry in {}", dir.display());
            continue;
        };
        if name.starts_with(prefix) {
            keys.push(name);
        }
    }

    keys.sort();
    Ok(keys)
}

/// Load an episode's metadata file.
pub async fn load_meta(quiz_dir: &Path) -> Result<QuizMeta> {
    let path = quiz_dir.join(META_FILE);
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read metadata file: {}", path.display()))?;
    parse_meta_str(&content, &path)
}

/// Discover every episode under `dir` and load its metadata.
pub async fn get_quizzes_details(dir: &Path, prefix: &str) -> Result<Vec<QuizSummary>> {
    let keys = list_quizzes(dir, prefix)?;
    tracing::debug!(count = keys.len(), dir = %dir.display(), "discovered episodes");

    let loads = keys.into_iter().map(|key| {
        let quiz_dir = dir.join(&key);
        async move {
            let mut meta = load_meta(&quiz_dir).await?;
            for reserved in RESERVED_KEYS {
                if meta.extra.remove(reserved).is_some() {
                    tracing::warn!(episode = %key, field = reserved, "ignoring reserved metadata key");
                }
            }
            Ok::<_, anyhow::Error>(QuizSummary {
                link: format!("./{key}/"),
                key,
                quiz_dir,
                meta,
            })
        }
    });

    try_join_all(loads).await
}

/// Whether the output path names a JavaScript/TypeScript module.
fn is_script_module(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "mjs" | "ts")
    )
}

/// Serialize summaries as JSON, or as `export const quizs = ...;` when the
/// output path is a script module.
pub fn render_data_module(summaries: &[QuizSummary], path: &Path) -> Result<String> {
    let json = serde_json::to_string_pretty(summaries).context("failed to serialize quiz list")?;
    Ok(if is_script_module(path) {
        format!("export const quizs = {json};\n")
    } else {
        format!("{json}\n")
    })
}

/// Write the generated data module.
pub fn write_data_module(summaries: &[QuizSummary], path: &Path) -> Result<()> {
    let content = render_data_module(summaries, path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write data module to {}", path.display()))?;
    Ok(())
}

/// Bundler inputs: page name to template path for every episode.
pub fn build_inputs(summaries: &[QuizSummary], root: &str) -> BTreeMap<String, String> {
    let root = root.trim_end_matches('/');
    summaries
        .iter()
        .map(|s| (s.key.clone(), format!("{root}/{}/index.html", s.key)))
        .collect()
}
