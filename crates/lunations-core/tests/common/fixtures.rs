//! Test fixture loading utilities

use std::cell::RefCell;
use std::path::PathBuf;

use lunations_core::sources::{ADSSource, ArticleSource, SourceError};
use lunations_core::Article;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a mock ADS response and parse its articles
#[allow(dead_code)]
pub fn load_response_articles(name: &str) -> Vec<Article> {
    let json = load_fixture(&format!("responses/{}", name));
    ADSSource::parse_search_response(&json)
        .expect("fixture should parse")
        .articles
}

/// Search source returning a fixed article list and remembering queries
#[allow(dead_code)]
pub struct FixedSource {
    articles: Vec<Article>,
    pub queries: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl FixedSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl ArticleSource for FixedSource {
    async fn search(&self, query: &str, _fields: &[&str]) -> Result<Vec<Article>, SourceError> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.articles.clone())
    }
}

/// Search source that always fails
#[allow(dead_code)]
pub struct FailingSource;

impl ArticleSource for FailingSource {
    async fn search(&self, _query: &str, _fields: &[&str]) -> Result<Vec<Article>, SourceError> {
        Err(SourceError::Parse("Invalid ADS JSON: expected value".to_string()))
    }
}
