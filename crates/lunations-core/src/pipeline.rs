//! The monthly digest run
//!
//! Load records, query the window, keep new articles with at least one
//! department author, save records, then order, render and write the
//! digest. Records are saved even when nothing new was found; the digest
//! file is only written when something was.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::DigestConfig;
use crate::digest::{order_accepted, render_digest, render_entries, AcceptedArticle};
use crate::domain::Article;
use crate::error::{DigestError, Result};
use crate::matching::AffiliationRule;
use crate::query::{build_monthly_query, ARTICLE_FIELDS};
use crate::records::{Record, RecordStore};
use crate::sources::ArticleSource;
use crate::window::ReportWindow;

/// Format of the `updated` column
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestOutcome {
    pub window: ReportWindow,
    /// Articles returned by the query
    pub checked: usize,
    /// Articles skipped because they were already recorded
    pub already_reported: usize,
    /// Articles skipped because no author matched
    pub unmatched: usize,
    pub accepted: usize,
    pub records_path: PathBuf,
    /// Digest file, if one was written
    pub digest_path: Option<PathBuf>,
}

pub struct DigestPipeline<S> {
    config: DigestConfig,
    source: S,
}

impl<S: ArticleSource> DigestPipeline<S> {
    pub fn new(config: DigestConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the digest for `window`, stamping new records with `now`
    pub async fn run(&self, window: ReportWindow, now: NaiveDateTime) -> Result<DigestOutcome> {
        let records_path = self.config.paths.records_path();
        let mut records = RecordStore::load(&records_path)?;
        info!(
            "Loaded {} records from {}",
            records.len(),
            records_path.display()
        );

        info!("Querying {}", window);
        let query = build_monthly_query(&self.config.institution.query, &window);
        debug!("Query: {}", query);
        let articles = self.source.search(&query, ARTICLE_FIELDS).await?;

        let checked = articles.len();
        let filtered = filter_new_articles(
            articles,
            &mut records,
            &self.config.affiliation_rule(),
            now,
        );
        info!("Total number of new articles: {}", filtered.accepted.len());

        records.save(&records_path)?;
        info!("Saved records to {}", records_path.display());

        let mut outcome = DigestOutcome {
            window,
            checked,
            already_reported: filtered.already_reported,
            unmatched: filtered.unmatched,
            accepted: filtered.accepted.len(),
            records_path,
            digest_path: None,
        };

        if filtered.accepted.is_empty() {
            return Ok(outcome);
        }

        let ordered = order_accepted(filtered.accepted);
        let entries = render_entries(&ordered, &self.config.summary_options());
        let digest = render_digest(&entries);

        let digest_path = self.config.paths.digest_path(&window);
        write_digest(&digest_path, &digest)?;
        info!("Wrote {} entries to {}", entries.len(), digest_path.display());

        outcome.digest_path = Some(digest_path);
        Ok(outcome)
    }
}

/// Result of the deduplication and affiliation filter
#[derive(Debug, Default)]
pub struct FilterResult {
    pub accepted: Vec<AcceptedArticle>,
    pub already_reported: usize,
    pub unmatched: usize,
}

/// Keep unreported articles with at least one matching author, recording
/// each accepted one in `records`. Arrival order is preserved.
pub fn filter_new_articles(
    articles: Vec<Article>,
    records: &mut RecordStore,
    rule: &AffiliationRule,
    now: NaiveDateTime,
) -> FilterResult {
    let mut result = FilterResult::default();

    for (i, article) in articles.into_iter().enumerate() {
        debug!("Checking article {} ({})", i, article.bibcode);

        if records.contains(article.id) {
            info!(
                "  Skipping article {} ({}) because already posted",
                i, article.bibcode
            );
            result.already_reported += 1;
            continue;
        }

        let matches = rule.matching_authors(&article);
        if matches.is_empty() {
            info!(
                "  Skipping article {} ({}) because no matched authors",
                i, article.bibcode
            );
            result.unmatched += 1;
            continue;
        }

        records.append(prepare_record(&article, now));
        result.accepted.push(AcceptedArticle::new(article, matches));
    }

    result
}

/// Build the record row for a newly accepted article
pub fn prepare_record(article: &Article, now: NaiveDateTime) -> Record {
    Record {
        id: article.id,
        updated: now.format(UPDATED_FORMAT).to_string(),
        title: article.title.clone().unwrap_or_default(),
        bibcode: article.bibcode.clone(),
        pubdate: article.pubdate.clone(),
    }
}

fn write_digest(path: &std::path::Path, digest: &str) -> Result<()> {
    let write_err = |e: std::io::Error| DigestError::DigestWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, digest).map_err(write_err)
}
