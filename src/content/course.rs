//! Course records as returned by the content API

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the cover format variant the catalog renders
pub const COVER_FORMAT: &str = "medium";

/// Top-level JSON wrapper: `{ data, meta, error? }`
///
/// `data` stays untyped until the error check has passed, so an error
/// envelope is honoured whatever its payload looks like.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Error object carried by a failed response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// True when a status is present and falls outside `[200, 300)`
    pub fn is_failure(&self) -> bool {
        self.status.is_some_and(|status| !(200..300).contains(&status))
    }
}

/// A single course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub attributes: CourseAttributes,
}

/// Course fields; keys the catalog does not use are kept in `extra`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAttributes {
    #[serde(default)]
    pub header: String,

    /// Markdown as fetched, HTML once the loader has run
    #[serde(default)]
    pub description: String,

    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cover: Option<Cover>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Relation wrapper around the cover media entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub data: Option<Media>,
}

/// An uploaded media entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub attributes: Option<MediaAttributes>,
}

/// Media fields; format variants stay raw until one is looked up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaAttributes {
    #[serde(default)]
    pub formats: Option<IndexMap<String, Value>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A pre-sized rendition of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFormat {
    pub url: String,
    pub width: u32,
    pub height: u32,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Course {
    /// Look up a named format variant of the cover
    ///
    /// `None` when any link of the chain is missing or the variant lacks a
    /// url or dimensions.
    pub fn cover_format(&self, name: &str) -> Option<ImageFormat> {
        let variant = self
            .attributes
            .cover
            .as_ref()?
            .data
            .as_ref()?
            .attributes
            .as_ref()?
            .formats
            .as_ref()?
            .get(name)?;

        match ImageFormat::deserialize(variant) {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::debug!("Course {} has an unusable {} cover: {}", self.id, name, e);
                None
            }
        }
    }

    /// Site-relative link to the course detail page
    pub fn link(&self) -> String {
        format!("/course/{}", self.id)
    }
}

/// Render-ready output of the loader
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseList {
    pub courses: Vec<Course>,
    pub meta: Map<String, Value>,
}

impl CourseList {
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
