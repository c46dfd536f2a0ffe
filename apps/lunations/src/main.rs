//! lunations - monthly publication digest
//!
//! Queries NASA ADS for the institution's articles from one month, skips
//! those already reported, and writes a digest of the rest.
//!
//! ```bash
//! ADS_API_TOKEN=... lunations            # previous calendar month
//! ADS_API_TOKEN=... lunations 2024 3     # March 2024
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lunations_core::{ADSSource, DigestConfig, DigestPipeline, ReportWindow};

/// Monthly digest of new institutional publications from NASA ADS
#[derive(Parser)]
#[command(name = "lunations")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Year to report on (defaults to the previous calendar month)
    #[arg(requires = "month")]
    year: Option<i32>,

    /// Month to report on, 1-12
    month: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the record file and digests (defaults to the
    /// executable's directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DigestConfig::load(path)?,
        None => DigestConfig::default(),
    };
    if let Some(dir) = cli.base_dir {
        config = config.with_base_dir(dir);
    } else if config.paths.base_dir.is_none() {
        config = config.with_base_dir(executable_dir()?);
    }

    let now = Local::now().naive_local();
    let window = ReportWindow::resolve(cli.year.zip(cli.month), now.date())?;

    let token = config.ads.token()?;
    let source = ADSSource::new(
        &config.ads.base_url,
        token,
        config.ads.rows,
        Duration::from_secs(config.ads.timeout_secs),
    )?;

    let pipeline = DigestPipeline::new(config, source);
    let outcome = pipeline.run(window, now).await?;

    match &outcome.digest_path {
        Some(path) => info!(
            "{} new articles for {} written to {}",
            outcome.accepted,
            outcome.window,
            path.display()
        ),
        None => info!("No new articles for {}", outcome.window),
    }

    Ok(())
}

fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    Ok(exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".")))
}
