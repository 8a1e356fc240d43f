//! Built-in catalog templates using the Tera template engine
//!
//! Templates are embedded in the binary. A site may override any of them by
//! placing a file with the same name under its `templates/` directory.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::helpers::{squash_whitespace, strip_html, truncate};

/// Embedded templates, by name
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("catalog/layout.html")),
    ("index.html", include_str!("catalog/index.html")),
    ("course.html", include_str!("catalog/course.html")),
];

/// Stylesheet written to `css/style.css`
pub const STYLESHEET: &str = include_str!("catalog/style.css");

/// Image written to the placeholder path when a cover is missing
pub const PLACEHOLDER_SVG: &str = include_str!("catalog/placeholder.svg");

/// Template renderer with embedded catalog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with the embedded templates only
    pub fn new() -> Result<Self> {
        Self::with_overrides(None)
    }

    /// Create a renderer, replacing embedded templates with files found in `override_dir`
    pub fn with_overrides(override_dir: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped when the render data is built; the description
        // is trusted HTML from the markdown renderer.
        tera.autoescape_on(vec![]);

        let mut sources: Vec<(String, String)> = TEMPLATES
            .iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect();

        if let Some(dir) = override_dir.filter(|d| d.is_dir()) {
            for (name, body) in sources.iter_mut() {
                let path = dir.join(name.as_str());
                if path.is_file() {
                    *body = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read template {}", path.display()))?;
                    tracing::debug!("Using template override {:?}", path);
                }
            }
        }

        tera.add_raw_templates(sources)?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("squash_whitespace", squash_whitespace_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("failed to render {template_name}"))
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: collapse whitespace runs
fn squash_whitespace_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("squash_whitespace", "value", String, value);
    Ok(tera::Value::String(squash_whitespace(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub favicon: String,
    pub language: String,
}

/// One course as the templates see it
///
/// Every field except `description` is HTML-escaped.
#[derive(Debug, Clone, Serialize)]
pub struct CourseCard {
    pub id: u64,
    pub link: String,
    pub header: String,
    pub description: String,
    pub published: String,
    pub published_iso: String,
    pub image: CardImage,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub placeholder: bool,
}
