//! Content API connection settings (environment supplied)

use url::Url;

/// Environment variable holding the content API base URL
pub const API_URL_VAR: &str = "STRAPI_API_URL";

/// Environment variable holding the server-side bearer token
pub const TOKEN_VAR: &str = "SSR_TOKEN";

/// Errors raised while validating the API configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set; export it or add it to .env")]
    Missing(&'static str),

    #[error("{var} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{var} must be an http(s) URL, got {value}")]
    UnsupportedScheme { var: &'static str, value: String },
}

/// Validated connection settings for the content API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending with a slash so relative joins keep its path
    pub base_url: Url,
    /// Bearer credential
    pub token: String,
}

impl ApiConfig {
    /// Validate raw values, typically coming from clap's `env` lookup
    pub fn new(api_url: Option<&str>, token: Option<&str>) -> Result<Self, ConfigError> {
        let api_url = api_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        let token = token
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_VAR))?;

        let mut base_url = Url::parse(api_url).map_err(|source| ConfigError::InvalidUrl {
            var: API_URL_VAR,
            value: api_url.to_string(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                var: API_URL_VAR,
                value: api_url.to_string(),
            });
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            base_url,
            token: token.to_string(),
        })
    }

    /// Endpoint listing every course with all relations expanded
    pub fn courses_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}courses", self.base_url.path()));
        url.set_query(Some("populate=*"));
        url
    }
}
