//! Author affiliation matching
//!
//! An author counts as a department member when any `;`-separated part of
//! their affiliation string contains both the department keyword and the
//! institution's postcode. Matching is plain substring containment on a
//! normalized (lowercased, comma/colon stripped) copy of each part.

use crate::domain::Article;

/// An author of an article whose affiliation satisfied an [`AffiliationRule`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffiliationMatch {
    /// Position of the author in the article's author list
    pub author_index: usize,
    pub author: String,
    /// Raw (unnormalized) affiliation string
    pub affiliation: String,
    /// Index of the first `;`-separated part that matched
    pub affiliation_index: usize,
}

/// Department keyword plus postcode that identify the target department
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffiliationRule {
    pub department_keyword: String,
    pub postcode: String,
}

impl Default for AffiliationRule {
    fn default() -> Self {
        Self::new("astronomy", "2611")
    }
}

impl AffiliationRule {
    pub fn new(department_keyword: impl Into<String>, postcode: impl Into<String>) -> Self {
        Self {
            department_keyword: department_keyword.into().to_lowercase(),
            postcode: postcode.into().to_lowercase(),
        }
    }

    /// Index of the first affiliation part naming the department, if any
    pub fn first_matching(&self, affiliation: &str) -> Option<usize> {
        normalize_affiliations(affiliation).iter().position(|part| {
            part.contains(&self.department_keyword) && part.contains(&self.postcode)
        })
    }

    pub fn is_match(&self, affiliation: &str) -> bool {
        self.first_matching(affiliation).is_some()
    }

    pub fn match_author(
        &self,
        author_index: usize,
        author: &str,
        affiliation: &str,
    ) -> Option<AffiliationMatch> {
        self.first_matching(affiliation)
            .map(|affiliation_index| AffiliationMatch {
                author_index,
                author: author.to_string(),
                affiliation: affiliation.to_string(),
                affiliation_index,
            })
    }

    /// All matching authors of an article, in author order
    pub fn matching_authors(&self, article: &Article) -> Vec<AffiliationMatch> {
        article
            .authors_with_affiliations()
            .enumerate()
            .filter_map(|(i, (author, aff))| self.match_author(i, author, aff))
            .collect()
    }
}

/// Split an affiliation string on `;` and normalize each part.
///
/// `&amp;` is decoded to `&`, commas and colons are removed, and each part
/// is lowercased and trimmed.
pub fn normalize_affiliations(affiliation: &str) -> Vec<String> {
    affiliation
        .replace("&amp;", "&")
        .split(';')
        .map(|part| {
            part.chars()
                .filter(|c| !matches!(c, ',' | ':'))
                .collect::<String>()
                .to_lowercase()
                .trim()
                .to_string()
        })
        .collect()
}
