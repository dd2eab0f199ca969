//! Project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizplane_plane::PlaneOptions;
use quizplane_site::DEFAULT_EPISODE_PREFIX;

/// File looked up in the current directory when no `--config` is given.
pub const CONFIG_FILE: &str = "quizplane.toml";

/// Top-level quizplane configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizplaneConfig {
    /// Root holding the episode directories.
    #[serde(default = "default_quizzes_dir")]
    pub quizzes_dir: PathBuf,
    /// Shared page template.
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Directory-name prefix identifying episodes.
    #[serde(default = "default_episode_prefix")]
    pub episode_prefix: String,
    /// Where `collect` writes the quiz list when no output is given.
    #[serde(default)]
    pub data_module: Option<PathBuf>,
    /// Plane rendering options for `score --plane` and `plane`.
    #[serde(default)]
    pub plane: PlaneOptions,
}

fn default_quizzes_dir() -> PathBuf {
    PathBuf::from("./src/quizs")
}
fn default_template() -> PathBuf {
    PathBuf::from("./src/quizs/quiz.template.html")
}
fn default_episode_prefix() -> String {
    DEFAULT_EPISODE_PREFIX.to_string()
}

impl Default for QuizplaneConfig {
    fn default() -> Self {
        Self {
            quizzes_dir: default_quizzes_dir(),
            template: default_template(),
            episode_prefix: default_episode_prefix(),
            data_module: None,
            plane: PlaneOptions::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or from `quizplane.toml` in the
/// current directory when present.
///
/// `QUIZPLANE_QUIZZES_DIR` overrides `quizzes_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizplaneConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        local.exists().then_some(local)
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizplaneConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizplaneConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZPLANE_QUIZZES_DIR") {
        config.quizzes_dir = PathBuf::from(dir);
    }

    config.quizzes_dir = resolve_path(&config.quizzes_dir);
    config.template = resolve_path(&config.template);
    config.data_module = config.data_module.as_deref().map(resolve_path);

    Ok(config)
}
