//! Page template rendering.
//!
//! Templates are plain HTML with `{{ key }}` placeholders, which are
//! HTML-escaped, and `{{{ key }}}` placeholders, which are inserted raw.
//! Unknown keys render as the empty string.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Escaped(String),
    Raw(String),
}

/// A parsed template, reusable across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Split template source into literal text and placeholders. An
    /// unterminated placeholder is kept as literal text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let (raw, open, close) = if rest[start..].starts_with("{{{") {
                (true, 3, "}}}")
            } else {
                (false, 2, "}}")
            };
            let after_open = &rest[start + open..];
            let Some(end) = after_open.find(close) else {
                break;
            };

            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let key = after_open[..end].trim().to_string();
            segments.push(if raw {
                Segment::Raw(key)
            } else {
                Segment::Escaped(key)
            });
            rest = &after_open[end + close.len()..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Self { segments }
    }

    /// Read and parse a template file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template: {}", path.display()))?;
        Ok(Self::parse(&source))
    }

    /// Placeholder keys in order of appearance.
    pub fn keys(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Escaped(k) | Segment::Raw(k) => Some(k.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    pub fn render(&self, context: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Escaped(key) => {
                    if let Some(value) = context.get(key) {
                        out.push_str(&html_escape(value));
                    }
                }
                Segment::Raw(key) => {
                    if let Some(value) = context.get(key) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

/// Parse and render in one step.
pub fn render_template(source: &str, context: &BTreeMap<String, String>) -> String {
    Template::parse(source).render(context)
}
