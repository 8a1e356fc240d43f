//! course-catalog: a static site generator for a course catalog
//!
//! Course records are fetched from a headless content API once per build,
//! their Markdown descriptions rendered to HTML, and the result written out
//! as a static page of course cards using embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A site on disk
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static files copied verbatim into the output
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Template overrides
    pub template_dir: PathBuf,
}

impl Site {
    /// Open a site from a directory, using defaults when no `_config.yml` exists
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let template_dir = base_dir.join("templates");

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            template_dir,
        }
    }

    /// Fetch the courses and generate the static site
    pub async fn generate(&self, api: &config::ApiConfig) -> Result<generator::Report> {
        commands::generate::run(self, api).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
