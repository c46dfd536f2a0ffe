//! Citation formatting for digest entries
//!
//! Each accepted article becomes one line:
//!
//! ```text
//! 1. <a href="https://ui.adsabs.harvard.edu/abs/2024ApJ...">Title</a><br>Smith, J.; *JONES, K.*, ApJ, 960, 2, 45 (2024).<br>
//! ```
//!
//! Department authors are emphasized and upper-cased. Author lists longer
//! than the configured threshold keep the first author and every department
//! author, collapsing the rest.

use crate::domain::Article;
use crate::matching::AffiliationRule;

/// Default author count above which lists are truncated
pub const DEFAULT_LONG_AUTHOR_LIST: usize = 50;

/// Default prefix for abstract page links
pub const DEFAULT_ABS_URL_PREFIX: &str = "https://ui.adsabs.harvard.edu/abs/";

const ELLIPSIS: &str = "...";
const ET_AL: &str = "et al.";
const IN_PRESS: &str = "in press";

/// Options controlling citation output
#[derive(Clone, Debug)]
pub struct SummaryOptions {
    pub rule: AffiliationRule,
    pub long_author_list: usize,
    pub abs_url_prefix: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            rule: AffiliationRule::default(),
            long_author_list: DEFAULT_LONG_AUTHOR_LIST,
            abs_url_prefix: DEFAULT_ABS_URL_PREFIX.to_string(),
        }
    }
}

/// Render an author name, emphasizing department members
pub fn format_author(name: &str, matched: bool) -> String {
    if matched {
        format!("*{}*", name.to_uppercase())
    } else {
        name.to_string()
    }
}

/// Render the author list of an article.
///
/// Lists of at most `long_author_list` authors are rendered in full. Longer
/// lists keep the first author and every matching author; each run of
/// skipped authors before a kept one becomes `...`, a trailing skipped run
/// becomes `et al.`, and the total number skipped is appended.
pub fn format_author_list(article: &Article, rule: &AffiliationRule, long_author_list: usize) -> String {
    let pairs = article.authors_with_affiliations();

    if article.author_count() <= long_author_list {
        return pairs
            .map(|(author, aff)| format_author(author, rule.is_match(aff)))
            .collect::<Vec<_>>()
            .join("; ");
    }

    let mut authors = Vec::new();
    let mut skip = 0usize;
    let mut total_skip = 0usize;

    for (j, (author, aff)) in pairs.enumerate() {
        let matched = rule.is_match(aff);
        if j == 0 {
            authors.push(format_author(author, matched));
        } else if matched {
            if skip > 0 {
                authors.push(ELLIPSIS.to_string());
                skip = 0;
            }
            authors.push(format_author(author, true));
        } else {
            skip += 1;
            total_skip += 1;
        }
    }

    if skip > 0 {
        authors.push(ET_AL.to_string());
    }

    format!("{} ({} authors not shown)", authors.join("; "), total_skip)
}

/// Display values derived from an article's optional fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationFields {
    pub volume: String,
    pub issue: String,
    pub page: String,
    pub year: String,
    pub url: String,
}

impl CitationFields {
    pub fn from_article(article: &Article, abs_url_prefix: &str) -> Self {
        Self {
            volume: article
                .volume
                .clone()
                .unwrap_or_else(|| IN_PRESS.to_string()),
            issue: article
                .issue
                .as_deref()
                .map(|i| format!(", {}", i))
                .unwrap_or_default(),
            page: article
                .first_page()
                .map(|p| format!(", {}", p))
                .unwrap_or_default(),
            year: article.year().to_string(),
            url: format!("{}{}", abs_url_prefix, article.bibcode),
        }
    }
}

/// Render the full digest line for an article at the given 1-based rank
pub fn format_summary(rank: usize, article: &Article, options: &SummaryOptions) -> String {
    let fields = CitationFields::from_article(article, &options.abs_url_prefix);
    let authors = format_author_list(article, &options.rule, options.long_author_list);

    format!(
        "{rank}. <a href=\"{url}\">{title}</a><br>{authors}, {venue}, {volume}{issue}{page} ({year}).<br>",
        rank = rank,
        url = fields.url,
        title = article.title.as_deref().unwrap_or(""),
        authors = authors,
        venue = article.publication.as_deref().unwrap_or(""),
        volume = fields.volume,
        issue = fields.issue,
        page = fields.page,
        year = fields.year,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSAA: &str = "RSAA, Australian National University, Canberra ACT 2611";
    const ELSEWHERE: &str = "Department of Physics, University of Somewhere";

    fn long_article(n: usize, matched: &[usize]) -> Article {
        (0..n).fold(Article::new(1, "2024Natur.1", "2024-05-00"), |a, i| {
            let aff = if matched.contains(&i) { RSAA } else { ELSEWHERE };
            a.with_author(format!("Author{}, A.", i), aff)
        })
    }

    #[test]
    fn test_format_author() {
        assert_eq!(format_author("Smith, Jane", true), "*SMITH, JANE*");
        assert_eq!(format_author("Smith, Jane", false), "Smith, Jane");
    }

    #[test]
    fn test_short_list_formats_everyone() {
        let article = Article::new(1, "x", "2024-01-00")
            .with_author("Smith, J.", ELSEWHERE)
            .with_author("Jones, K.", RSAA);

        let out = format_author_list(&article, &AffiliationRule::default(), 50);
        assert_eq!(out, "Smith, J.; *JONES, K.*");
    }

    #[test]
    fn test_exactly_threshold_is_not_truncated() {
        let article = long_article(50, &[10]);
        let out = format_author_list(&article, &AffiliationRule::default(), 50);
        assert_eq!(out.split("; ").count(), 50);
        assert!(!out.contains("not shown"));
    }

    #[test]
    fn test_long_list_keeps_first_and_matched() {
        let article = long_article(60, &[0, 5, 12]);
        let out = format_author_list(&article, &AffiliationRule::default(), 50);
        assert_eq!(
            out,
            "*AUTHOR0, A.*; ...; *AUTHOR5, A.*; ...; *AUTHOR12, A.*; et al. (57 authors not shown)"
        );
    }

    #[test]
    fn test_long_list_unmatched_first_author() {
        let article = long_article(60, &[5, 12]);
        let out = format_author_list(&article, &AffiliationRule::default(), 50);
        assert!(out.starts_with("Author0, A.; ...; *AUTHOR5, A.*"));
        assert!(out.ends_with("et al. (57 authors not shown)"));
    }

    #[test]
    fn test_long_list_ending_on_match_has_no_et_al() {
        let article = long_article(55, &[54]);
        let out = format_author_list(&article, &AffiliationRule::default(), 50);
        assert_eq!(out, "Author0, A.; ...; *AUTHOR54, A.* (53 authors not shown)");
    }

    #[test]
    fn test_citation_fields_absent_values() {
        let article = Article::new(1, "2024arXiv240112345S", "2024-01-00");
        let fields = CitationFields::from_article(&article, DEFAULT_ABS_URL_PREFIX);

        assert_eq!(fields.volume, "in press");
        assert_eq!(fields.issue, "");
        assert_eq!(fields.page, "");
        assert_eq!(fields.year, "2024");
        assert_eq!(
            fields.url,
            "https://ui.adsabs.harvard.edu/abs/2024arXiv240112345S"
        );
    }

    #[test]
    fn test_format_summary_line() {
        let mut article = Article::new(7, "2024ApJ...960...45S", "2024-02-00")
            .with_title("Stars in the Southern Sky")
            .with_author("Smith, J.", ELSEWHERE)
            .with_author("Jones, K.", RSAA);
        article.publication = Some("The Astrophysical Journal".to_string());
        article.volume = Some("960".to_string());
        article.issue = Some("2".to_string());
        article.pages = Some(vec!["45".to_string()]);

        let line = format_summary(1, &article, &SummaryOptions::default());
        assert_eq!(
            line,
            "1. <a href=\"https://ui.adsabs.harvard.edu/abs/2024ApJ...960...45S\">Stars in the Southern Sky</a><br>Smith, J.; *JONES, K.*, The Astrophysical Journal, 960, 2, 45 (2024).<br>"
        );
    }
}
