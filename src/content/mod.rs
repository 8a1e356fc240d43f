//! Content module - course records, description rendering and loading

mod course;
pub mod loader;
mod markdown;

pub use course::{
    ApiError, ApiResponse, Course, CourseAttributes, CourseList, Cover, ImageFormat, Media,
    MediaAttributes, COVER_FORMAT,
};
pub use loader::CourseLoader;
pub use markdown::MarkdownRenderer;
