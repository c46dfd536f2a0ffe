//! Article domain model
//!
//! An article as returned by the bibliographic database. Fields the database
//! may omit are `Option`s; presentation substitutes ("in press", empty
//! strings) are applied by the summary formatter only.

use serde::{Deserialize, Serialize};

/// An article fetched from the search source
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i32,
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Affiliation strings, parallel to `authors`
    pub affiliations: Vec<String>,
    pub bibcode: String,
    pub publication: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<Vec<String>>,
    /// Publication date as `YYYY-MM-DD` (day may be `00`)
    pub pubdate: String,
}

impl Article {
    /// Create an article with required fields
    pub fn new(id: i32, bibcode: impl Into<String>, pubdate: impl Into<String>) -> Self {
        Self {
            id,
            bibcode: bibcode.into(),
            pubdate: pubdate.into(),
            ..Default::default()
        }
    }

    /// Add an author with their affiliation string
    pub fn with_author(mut self, name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        // Keep the lists parallel even if affiliations were short
        self.affiliations.resize(self.authors.len(), String::new());
        self.authors.push(name.into());
        self.affiliations.push(affiliation.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Iterate (author, affiliation) pairs in author order.
    ///
    /// Authors without a corresponding affiliation entry are paired with an
    /// empty string.
    pub fn authors_with_affiliations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.authors.iter().enumerate().map(|(i, author)| {
            let aff = self.affiliations.get(i).map(String::as_str).unwrap_or("");
            (author.as_str(), aff)
        })
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// First page, if present and non-empty
    pub fn first_page(&self) -> Option<&str> {
        self.pages
            .as_ref()?
            .first()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Publication year: the first `-`-separated token of `pubdate`
    pub fn year(&self) -> &str {
        self.pubdate.split('-').next().unwrap_or("")
    }
}
