//! NASA ADS (Astrophysics Data System) search source
//!
//! API docs: https://ui.adsabs.harvard.edu/help/api/
//!
//! Results are paged with `rows`/`start` until `numFound` documents have
//! been read. No retries: any failed page fails the whole search.

use std::time::Duration;

use serde::Deserialize;

use super::traits::{ArticleSource, SourceError};
use crate::domain::Article;
use crate::http::{HttpClient, HttpError};

pub const ADS_API_URL: &str = "https://api.adsabs.harvard.edu/v1";

/// ADS API response wrapper
#[derive(Debug, Deserialize)]
struct ADSResponse {
    response: ADSResponseBody,
}

#[derive(Debug, Deserialize)]
struct ADSResponseBody {
    docs: Vec<ADSDocument>,
    #[serde(rename = "numFound")]
    num_found: Option<usize>,
}

/// Custom deserializer for the id field, which ADS returns as a string
fn deserialize_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a 32-bit integer or a string containing one")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// String lists where ADS may put `null` in place of an entry (missing
/// affiliations, unpaginated articles). Null entries become empty strings so
/// positions in parallel lists are preserved.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let list: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(list.map(|items| items.into_iter().map(Option::unwrap_or_default).collect()))
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Single document from ADS search results
#[derive(Debug, Deserialize)]
struct ADSDocument {
    #[serde(deserialize_with = "deserialize_id")]
    id: i32,
    bibcode: String,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    title: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    author: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    aff: Option<Vec<String>>,
    #[serde(rename = "pub")]
    publication: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    page: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pubdate: String,
}

impl From<ADSDocument> for Article {
    fn from(doc: ADSDocument) -> Self {
        Article {
            id: doc.id,
            title: doc.title.and_then(|t| t.into_iter().next()),
            authors: doc.author.unwrap_or_default(),
            affiliations: doc.aff.unwrap_or_default(),
            bibcode: doc.bibcode,
            publication: doc.publication,
            volume: doc.volume,
            issue: doc.issue,
            pages: doc.page,
            pubdate: doc.pubdate,
        }
    }
}

/// One page of search results
#[derive(Debug)]
pub struct SearchPage {
    pub articles: Vec<Article>,
    pub num_found: Option<usize>,
}

pub struct ADSSource {
    client: HttpClient,
    base_url: String,
    token: String,
    rows: usize,
}

impl ADSSource {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        rows: usize,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::new("lunations/0.1 (monthly ADS digest)", timeout)?,
            base_url: base_url.into(),
            token: token.into(),
            rows: rows.max(1),
        })
    }

    /// Parse one ADS search response page
    pub fn parse_search_response(json: &str) -> Result<SearchPage, SourceError> {
        let response: ADSResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid ADS JSON: {}", e)))?;

        Ok(SearchPage {
            num_found: response.response.num_found,
            articles: response
                .response
                .docs
                .into_iter()
                .map(Article::from)
                .collect(),
        })
    }

    async fn fetch_page(
        &self,
        query: &str,
        fields: &str,
        start: usize,
    ) -> Result<SearchPage, SourceError> {
        let url = format!("{}/search/query", self.base_url.trim_end_matches('/'));
        let rows = self.rows.to_string();
        let start = start.to_string();
        let params = [
            ("q", query),
            ("fl", fields),
            ("rows", rows.as_str()),
            ("start", start.as_str()),
        ];

        let response = self
            .client
            .get_with_params(&url, &params, Some(&self.token))
            .await?;

        if !response.is_success() {
            return Err(HttpError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        Self::parse_search_response(&response.body)
    }
}

impl ArticleSource for ADSSource {
    async fn search(&self, query: &str, fields: &[&str]) -> Result<Vec<Article>, SourceError> {
        let fields = fields.join(",");
        let mut articles = Vec::new();

        loop {
            let page = self.fetch_page(query, &fields, articles.len()).await?;
            let received = page.articles.len();
            tracing::debug!(
                "ADS page at {}: {} articles (numFound {:?})",
                articles.len(),
                received,
                page.num_found
            );

            articles.extend(page.articles);

            let exhausted = match page.num_found {
                Some(total) => articles.len() >= total,
                None => received < self.rows,
            };
            if received == 0 || exhausted {
                break;
            }
        }

        Ok(articles)
    }
}
