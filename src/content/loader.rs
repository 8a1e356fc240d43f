//! Content loader - fetches courses from the content API and renders their descriptions

use anyhow::{Context, Result};
use reqwest::Client;

use super::{ApiResponse, Course, CourseList, MarkdownRenderer};
use crate::config::{ApiConfig, MarkdownConfig};

/// Loads the course list once per build
pub struct CourseLoader {
    api: ApiConfig,
    http: Client,
    renderer: MarkdownRenderer,
}

impl CourseLoader {
    /// Create a new course loader
    pub fn new(api: ApiConfig, markdown: &MarkdownConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("course-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to configure HTTP client")?;

        Ok(Self {
            api,
            http,
            renderer: MarkdownRenderer::with_config(markdown),
        })
    }

    /// Fetch and transform the course list
    pub async fn load(&self) -> Result<CourseList> {
        let envelope = self.fetch().await?;
        self.transform(envelope)
    }

    /// Issue the single read request and decode the envelope
    ///
    /// The HTTP status is not checked here: error envelopes carry their own
    /// status, which `transform` inspects.
    pub async fn fetch(&self) -> Result<ApiResponse> {
        let url = self.api.courses_url();
        tracing::debug!("Fetching courses from {}", url);

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.api.token)
            .send()
            .await
            .with_context(|| format!("failed to fetch courses from {url}"))?;

        tracing::debug!("Content API answered {}", response.status());

        response
            .json::<ApiResponse>()
            .await
            .with_context(|| format!("failed to decode response from {url}"))
    }

    /// Turn a decoded envelope into render-ready courses
    ///
    /// An error envelope with a status outside `[200, 300)` yields an empty
    /// list and empty metadata.
    pub fn transform(&self, envelope: ApiResponse) -> Result<CourseList> {
        if envelope.error.as_ref().is_some_and(|e| e.is_failure()) {
            return Ok(CourseList::default());
        }

        let courses: Vec<Course> = if envelope.data.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(envelope.data).context("unexpected course data shape")?
        };

        let courses = courses
            .into_iter()
            .map(|mut course| {
                let html = self.renderer.render(&course.attributes.description);
                course.attributes.description = html;
                course
            })
            .collect();

        Ok(CourseList {
            courses,
            meta: envelope.meta.unwrap_or_default(),
        })
    }
}
