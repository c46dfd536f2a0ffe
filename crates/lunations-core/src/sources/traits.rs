//! Common traits for search sources

use thiserror::Error;

use crate::domain::Article;
use crate::http::HttpError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// A bibliographic search backend.
///
/// Returns every article matching `query` with the requested `fields`, in
/// the backend's own order.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    async fn search(&self, query: &str, fields: &[&str]) -> Result<Vec<Article>, SourceError>;
}

