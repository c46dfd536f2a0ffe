//! Configuration for a digest run
//!
//! Everything the run needs besides the clock: institution strings,
//! formatting threshold, file path templates, and ADS access settings.
//! Loaded from TOML; every field has a default, so an empty file (or no
//! file) gives the RSAA configuration.
//!
//! ```toml
//! [institution]
//! query = 'aff:"Australian National University"'
//! department_keyword = "astronomy"
//! postcode = "2611"
//!
//! [format]
//! long_author_list = 50
//!
//! [paths]
//! base_dir = "/srv/lunations"
//! records = "{base}/records.csv"
//! digest = "{base}/lunations/RSAA_Papers_{year}_{month}.txt"
//!
//! [ads]
//! token_env = "ADS_API_TOKEN"
//! rows = 200
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::AffiliationRule;
use crate::sources::ads::ADS_API_URL;
use crate::summary::{SummaryOptions, DEFAULT_ABS_URL_PREFIX, DEFAULT_LONG_AUTHOR_LIST};
use crate::window::ReportWindow;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("Missing API token: environment variable {0} is not set")]
    MissingToken(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub institution: InstitutionConfig,
    pub format: FormatConfig,
    pub paths: PathsConfig,
    pub ads: AdsConfig,
}

/// Strings identifying the institution and department
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionConfig {
    /// ADS clause selecting the institution
    pub query: String,
    pub department_keyword: String,
    pub postcode: String,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            query: r#"aff:"Australian National University""#.to_string(),
            department_keyword: "astronomy".to_string(),
            postcode: "2611".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Author count above which author lists are truncated
    pub long_author_list: usize,
    pub abs_url_prefix: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            long_author_list: DEFAULT_LONG_AUTHOR_LIST,
            abs_url_prefix: DEFAULT_ABS_URL_PREFIX.to_string(),
        }
    }
}

/// File locations. `{base}` expands to `base_dir`; the digest template
/// also takes `{year}` and `{month}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory `{base}` expands to; the binary fills in its own
    /// directory when unset
    pub base_dir: Option<PathBuf>,
    pub records: String,
    pub digest: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            records: "{base}/records.csv".to_string(),
            digest: "{base}/lunations/RSAA_Papers_{year}_{month}.txt".to_string(),
        }
    }
}

impl PathsConfig {
    fn expand_base(&self, template: &str) -> String {
        let base = self.base_dir.as_deref().unwrap_or_else(|| Path::new("."));
        template.replace("{base}", &base.to_string_lossy())
    }

    pub fn records_path(&self) -> PathBuf {
        PathBuf::from(self.expand_base(&self.records))
    }

    /// Digest path for a window (month not zero-padded)
    pub fn digest_path(&self, window: &ReportWindow) -> PathBuf {
        PathBuf::from(
            self.expand_base(&self.digest)
                .replace("{year}", &window.year.to_string())
                .replace("{month}", &window.month.to_string()),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    pub base_url: String,
    /// Environment variable holding the API token
    pub token_env: String,
    /// Page size for search requests
    pub rows: usize,
    pub timeout_secs: u64,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            base_url: ADS_API_URL.to_string(),
            token_env: "ADS_API_TOKEN".to_string(),
            rows: 200,
            timeout_secs: 30,
        }
    }
}

impl AdsConfig {
    /// Read the API token from the configured environment variable
    pub fn token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingToken(self.token_env.clone()))
    }
}

impl DigestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.paths.base_dir = Some(base_dir.into());
        self
    }

    pub fn affiliation_rule(&self) -> AffiliationRule {
        AffiliationRule::new(
            &self.institution.department_keyword,
            &self.institution.postcode,
        )
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            rule: self.affiliation_rule(),
            long_author_list: self.format.long_author_list,
            abs_url_prefix: self.format.abs_url_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_is_default() {
        let config = DigestConfig::from_toml("").unwrap();
        assert_eq!(config.format.long_author_list, 50);
        assert_eq!(config.institution.postcode, "2611");
        assert_eq!(config.ads.token_env, "ADS_API_TOKEN");
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[institution]
department_keyword = "Physics"

[format]
long_author_list = 20

[paths]
base_dir = "/srv/digest"
"#;
        let config = DigestConfig::from_toml(toml).unwrap();
        assert_eq!(config.institution.department_keyword, "Physics");
        assert_eq!(config.institution.postcode, "2611");
        assert_eq!(config.format.long_author_list, 20);
        assert_eq!(config.affiliation_rule().department_keyword, "physics");
        assert_eq!(
            config.paths.records_path(),
            PathBuf::from("/srv/digest/records.csv")
        );
    }

    #[test]
    fn test_unset_base_dir_is_relative() {
        let config = DigestConfig::default();
        assert_eq!(config.paths.records_path(), PathBuf::from("./records.csv"));
    }

    #[test]
    fn test_digest_path() {
        let config = DigestConfig::default().with_base_dir("/tmp/x");
        let window = ReportWindow::new(2024, 3).unwrap();
        assert_eq!(
            config.paths.digest_path(&window),
            PathBuf::from("/tmp/x/lunations/RSAA_Papers_2024_3.txt")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[ads]\nrows = 50\n").unwrap();
        file.flush().unwrap();

        let config = DigestConfig::load(file.path()).unwrap();
        assert_eq!(config.ads.rows, 50);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            DigestConfig::from_toml("[format]\nlong_author_list = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_token() {
        let ads = AdsConfig {
            token_env: "LUNATIONS_TEST_TOKEN_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(ads.token(), Err(ConfigError::MissingToken(_))));
    }
}
