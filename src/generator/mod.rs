//! Generator module - renders the course catalog into static files

use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Course, CourseList, COVER_FORMAT};
use crate::helpers::{date_string, date_xml, html_escape, media_url, output_path_for};
use crate::templates::{
    CardImage, ConfigData, CourseCard, TemplateRenderer, PLACEHOLDER_SVG, STYLESHEET,
};
use crate::Site;

/// Public subdirectory holding one page per course
const COURSE_DIR: &str = "course";

/// Summary of a finished generation
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Number of course cards on the index page
    pub courses: usize,
    /// Files written, relative to the public directory
    pub files: Vec<String>,
}

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    tz: chrono_tz::Tz,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::with_overrides(Some(&site.template_dir))?;

        Ok(Self {
            site: site.clone(),
            renderer,
            tz: site.config.tz(),
        })
    }

    /// Render every output file, then write them all
    ///
    /// Nothing is written when any page fails to render. Detail pages from a
    /// previous build are removed first, so courses that are gone stay gone.
    pub fn generate(&self, list: &CourseList) -> Result<Report> {
        let outputs = self.render(list)?;

        let course_dir = self.site.public_dir.join(COURSE_DIR);
        if course_dir.exists() {
            fs::remove_dir_all(&course_dir)
                .with_context(|| format!("failed to remove {}", course_dir.display()))?;
        }
        fs::create_dir_all(&self.site.public_dir)?;

        let mut files = Vec::with_capacity(outputs.len());
        for (relative, content) in outputs {
            let output_path = self.site.public_dir.join(&relative);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, content)
                .with_context(|| format!("failed to write {}", output_path.display()))?;
            tracing::debug!("Generated: {:?}", output_path);
            files.push(relative);
        }

        files.extend(self.copy_source_assets()?);

        Ok(Report {
            courses: list.len(),
            files,
        })
    }

    /// Render all outputs in memory, keyed by path relative to the public dir
    pub fn render(&self, list: &CourseList) -> Result<BTreeMap<String, String>> {
        let config_data = self.build_config_data();
        let cards: Vec<CourseCard> = list.courses.iter().map(|c| self.course_card(c)).collect();

        let mut outputs = BTreeMap::new();

        // Index page
        let mut context = self.create_base_context(&config_data);
        context.insert("courses", &cards);
        context.insert("current_path", "/");
        outputs.insert(
            output_path_for("/"),
            self.renderer.render("index.html", &context)?,
        );

        // Course detail pages
        for card in &cards {
            let mut context = self.create_base_context(&config_data);
            context.insert("course", card);
            context.insert("current_path", &card.link);
            outputs.insert(
                output_path_for(&card.link),
                self.renderer.render("course.html", &context)?,
            );
        }

        outputs.insert(
            "courses.json".to_string(),
            serde_json::to_string_pretty(list)?,
        );
        outputs.insert("css/style.css".to_string(), STYLESHEET.to_string());

        if let Some(path) = self.local_placeholder_path() {
            outputs.insert(path, PLACEHOLDER_SVG.to_string());
        }

        Ok(outputs)
    }

    /// Build the template view of one course
    pub fn course_card(&self, course: &Course) -> CourseCard {
        let header = &course.attributes.header;
        let alt = html_escape(&format!("Cover for {}", header));

        let image = match course.cover_format(COVER_FORMAT) {
            Some(format) => CardImage {
                src: html_escape(&media_url(&self.site.config.media_host, &format.url)),
                width: format.width,
                height: format.height,
                alt,
                placeholder: false,
            },
            None => {
                tracing::warn!(
                    "Course {} has no {} cover, using placeholder",
                    course.id,
                    COVER_FORMAT
                );
                let placeholder = &self.site.config.placeholder;
                CardImage {
                    src: html_escape(&placeholder.url),
                    width: placeholder.width,
                    height: placeholder.height,
                    alt,
                    placeholder: true,
                }
            }
        };

        let (published, published_iso) = match &course.attributes.published_at {
            Some(date) => (date_string(date, &self.tz), date_xml(date)),
            None => (String::new(), String::new()),
        };

        CourseCard {
            id: course.id,
            link: course.link(),
            header: html_escape(header),
            description: course.attributes.description.clone(),
            published,
            published_iso,
            image,
        }
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.site.config;
        ConfigData {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            favicon: html_escape(&config.favicon),
            language: html_escape(&config.language),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, config_data: &ConfigData) -> Context {
        let mut context = Context::new();
        context.insert("config", config_data);
        context.insert("generator_version", env!("CARGO_PKG_VERSION"));
        context
    }

    /// Output path of the placeholder image, when it is served by this site
    fn local_placeholder_path(&self) -> Option<String> {
        let url = &self.site.config.placeholder.url;
        if url.starts_with('/') && !url.starts_with("//") && url.ends_with(".svg") {
            Some(url.trim_start_matches('/').to_string())
        } else {
            None
        }
    }

    /// Copy source assets (favicon, images, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<Vec<String>> {
        let source_dir = &self.site.source_dir;
        let mut copied = Vec::new();

        if !source_dir.exists() {
            return Ok(copied);
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            let dest: PathBuf = self.site.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)
                .with_context(|| format!("failed to copy {}", path.display()))?;
            copied.push(relative.to_string_lossy().replace('\\', "/"));
        }

        Ok(copied)
    }
}
