//! ADS query construction for a report window
//!
//! Selects refereed articles published in the window, or preprints whose
//! new-style arXiv identifier starts with the window's `YYMM`, restricted
//! to the institution's affiliation clause.

use lazy_static::lazy_static;
use regex::Regex;

use crate::window::ReportWindow;

/// ADS fields requested for each article
pub const ARTICLE_FIELDS: &[&str] = &[
    "id",
    "first_author",
    "author",
    "aff",
    "title",
    "year",
    "bibcode",
    "identifier",
    "journal",
    "volume",
    "pub",
    "page",
    "issue",
    "pubdate",
];

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Collapse runs of two or more whitespace characters and trim
pub fn normalize_whitespace(query: &str) -> String {
    WHITESPACE_RUN.replace_all(query, " ").trim().to_string()
}

/// Build the monthly query for an institution affiliation clause
pub fn build_monthly_query(institution_query: &str, window: &ReportWindow) -> String {
    let query = format!(
        r#"
    {institution}
    AND (
            (property:refereed AND pubdate:{pubdate})
        OR  identifier:"{prefix}.*"
        )
    "#,
        institution = institution_query,
        pubdate = window.pubdate(),
        prefix = window.arxiv_prefix(),
    );

    normalize_whitespace(&query)
}
