//! Ordering and rendering of accepted articles

use crate::domain::Article;
use crate::matching::AffiliationMatch;
use crate::summary::{format_summary, SummaryOptions};

/// Sort key for an accepted article without any matched author
pub const UNMATCHED_SORT_KEY: usize = 1000;

/// A new article that passed deduplication and affiliation matching
#[derive(Clone, Debug)]
pub struct AcceptedArticle {
    pub article: Article,
    /// Matching authors, in author order
    pub matches: Vec<AffiliationMatch>,
}

impl AcceptedArticle {
    pub fn new(article: Article, matches: Vec<AffiliationMatch>) -> Self {
        Self { article, matches }
    }

    /// Author index of the first department author
    pub fn sort_key(&self) -> usize {
        self.matches
            .first()
            .map_or(UNMATCHED_SORT_KEY, |m| m.author_index)
    }
}

/// One rendered digest line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestEntry {
    pub rank: usize,
    pub text: String,
}

/// Order articles by their first department author, keeping arrival order
/// among ties
pub fn order_accepted(mut accepted: Vec<AcceptedArticle>) -> Vec<AcceptedArticle> {
    accepted.sort_by_key(AcceptedArticle::sort_key);
    accepted
}

/// Render ordered articles with 1-based ranks
pub fn render_entries(ordered: &[AcceptedArticle], options: &SummaryOptions) -> Vec<DigestEntry> {
    ordered
        .iter()
        .enumerate()
        .map(|(i, accepted)| {
            let rank = i + 1;
            DigestEntry {
                rank,
                text: format_summary(rank, &accepted.article, options),
            }
        })
        .collect()
}

/// Join entries into the digest text, one entry per line
pub fn render_digest(entries: &[DigestEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
