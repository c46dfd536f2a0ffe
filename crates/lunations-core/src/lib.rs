//! lunations-core: monthly institutional publication digests
//!
//! This library provides:
//! - Affiliation matching against a department keyword and institution postcode
//! - A fixed-schema record table of already-reported articles
//! - Citation formatting with long author list truncation
//! - ADS query construction and a paging search client
//! - The digest pipeline tying them together
//!
//! The `lunations` binary in `apps/lunations` is a thin CLI over
//! [`pipeline::DigestPipeline`].

pub mod config;
pub mod digest;
pub mod domain;
pub mod error;
pub mod http;
pub mod matching;
pub mod pipeline;
pub mod query;
pub mod records;
pub mod sources;
pub mod summary;
pub mod window;

pub use config::DigestConfig;
pub use digest::{AcceptedArticle, DigestEntry};
pub use domain::Article;
pub use error::{DigestError, Result};
pub use matching::{AffiliationMatch, AffiliationRule};
pub use pipeline::{DigestOutcome, DigestPipeline};
pub use records::{Record, RecordStore};
pub use sources::{ADSSource, ArticleSource, SourceError};
pub use window::ReportWindow;

/// Returns the version of lunations-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
