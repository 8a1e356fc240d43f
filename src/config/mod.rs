//! Configuration module

mod api;
mod site;

pub use api::{ApiConfig, ConfigError, API_URL_VAR, TOKEN_VAR};
pub use site::MarkdownConfig;
pub use site::PlaceholderConfig;
pub use site::SiteConfig;
