//! The `quizplane plane` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizplane_plane::{write_svg, PlanePoint};

use crate::config::QuizplaneConfig;

pub fn execute(
    points_path: PathBuf,
    output: PathBuf,
    no_grid: bool,
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    config: &QuizplaneConfig,
) -> Result<()> {
    let content = std::fs::read_to_string(&points_path)
        .with_context(|| format!("failed to read points: {}", points_path.display()))?;
    let points: Vec<PlanePoint> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse points: {}", points_path.display()))?;

    let mut options = config.plane.clone();
    if no_grid {
        options.show_grid = false;
    }
    if let Some(width) = width {
        options.width = width;
    }
    if let Some(height) = height {
        options.height = height;
    }
    if let Some(padding) = padding {
        options.padding = padding;
    }

    write_svg(&points, &options, &output)?;
    println!("Plotted {} point(s) to {}", points.len(), output.display());

    Ok(())
}
