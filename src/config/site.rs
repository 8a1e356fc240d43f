//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub favicon: String,
    pub language: String,
    pub timezone: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Media
    pub media_host: String,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,

    // Writing
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Courses".to_string(),
            description: "IT courses for everyone".to_string(),
            favicon: "/favicon.ico".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),

            media_host: "http://localhost:1337".to_string(),
            placeholder: PlaceholderConfig::default(),

            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC for unknown names
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                chrono_tz::UTC
            }
        }
    }
}

/// Image used for courses whose cover has no usable format variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            url: "/images/placeholder.svg".to_string(),
            width: 750,
            height: 500,
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub allow_raw_html: bool,
    pub highlight: bool,
    pub line_numbers: bool,
    pub theme: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            allow_raw_html: false,
            highlight: false,
            line_numbers: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}
