pub mod http;

use std::env;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::AppError;
use crate::models::{Todo, TodoDraft, TodoId};

pub use http::HttpTodoApi;

pub const BASE_URL_VAR: &str = "QUESTLOG_API_BASE_URL";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(AppError::Configuration(format!("{} is empty", BASE_URL_VAR)));
        }

        let base_url = Url::parse(trimmed).map_err(|e| {
            AppError::Configuration(format!("invalid base URL '{}': {}", trimmed, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "base URL '{}' must be an http(s) URL",
                trimmed
            )));
        }

        Ok(Self { base_url })
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var(BASE_URL_VAR)
            .map_err(|_| AppError::Configuration(format!("{} is not set", BASE_URL_VAR)))?;
        Self::new(&base_url)
    }

    /// `{base}/{id}`, with the id encoded as a single path segment.
    pub fn item_url(&self, id: &TodoId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }
}

/// The four calls the todo resource supports. One request per call, no retries.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, AppError>;
    async fn create(&self, draft: &TodoDraft) -> Result<Todo, AppError>;
    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, AppError>;
    async fn delete(&self, id: &TodoId) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ApiConfig::new("http://localhost:5000/api/todos//").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/api/todos");
    }

    #[test]
    fn item_url_appends_one_segment() {
        let config = ApiConfig::new("http://localhost:5000/api/todos").unwrap();
        let url = config.item_url(&TodoId::from("65a1f0"));
        assert_eq!(url.as_str(), "http://localhost:5000/api/todos/65a1f0");
    }

    #[test]
    fn item_url_encodes_reserved_characters() {
        let config = ApiConfig::new("http://localhost:5000/todos").unwrap();
        let url = config.item_url(&TodoId::from("a/b c"));
        assert_eq!(url.as_str(), "http://localhost:5000/todos/a%2Fb%20c");
    }

    #[test]
    fn item_url_on_bare_host() {
        let config = ApiConfig::new("http://localhost:5000/").unwrap();
        let url = config.item_url(&TodoId::from("t1"));
        assert_eq!(url.as_str(), "http://localhost:5000/t1");
    }

    #[test]
    fn blank_base_url_is_a_configuration_error() {
        let err = ApiConfig::new("   ").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        assert!(matches!(
            ApiConfig::new("mailto:someone@example.com"),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            ApiConfig::new("ftp://example.com/todos"),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(AppError::Configuration(_))
        ));
    }
}
