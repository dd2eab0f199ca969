//! The `quizplane init` command.

use std::path::Path;

use anyhow::Result;

/// Write `content` to `path` unless it already exists.
fn write_starter(path: &str, content: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn execute() -> Result<()> {
    write_starter("quizplane.toml", SAMPLE_CONFIG)?;
    write_starter("src/quizs/quiz.template.html", SAMPLE_TEMPLATE)?;
    write_starter("src/quizs/ep01-example/meta.toml", EXAMPLE_META)?;
    write_starter("src/quizs/ep01-example/quiz.toml", EXAMPLE_QUIZ)?;

    println!("\nNext steps:");
    println!("  1. Run: quizplane validate");
    println!("  2. Run: quizplane collect ./src/quizs ./src/quizList.js");
    println!("  3. Run: quizplane generate");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizplane configuration

quizzes_dir = "./src/quizs"
template = "./src/quizs/quiz.template.html"
episode_prefix = "ep"
data_module = "./src/quizList.js"

[plane]
width = 680
height = 680
padding = 100
show_grid = true
"#;

const SAMPLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ episode }} {{ title }}</title>
</head>
<body>
  <h1>{{ title }}</h1>
  <p>{{ episodeTitle }} / {{ author }}</p>
  <form id="quiz">
    {{{ questions_html }}}
    <button type="submit">送出</button>
  </form>
  <div id="plane"></div>
</body>
</html>
"#;

const EXAMPLE_META: &str = r#"episode = "EP01"
episodeTitle = "Example"
title = "An example quiz"
author = "You"
description = "Two questions to get started"
"#;

const EXAMPLE_QUIZ: &str = r#"methods = "default"

[[default_options]]
text = "Yes"
value = "yes"
score = 1

[[default_options]]
text = "No"
value = "no"
score = 0

[[questions]]
index = 0
text = "Do you like quizzes?"

[[questions]]
index = 1
text = "Would you take another one?"
"#;
