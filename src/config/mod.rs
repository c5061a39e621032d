pub mod cli;
pub mod toml_config;

use crate::core::allocation::API_LIMIT;
use crate::core::news_client::NEWSAPI_BASE_URL;
use crate::utils::validation::NEWS_CATEGORIES;

/// 讀取 API key 的環境變數
pub const API_KEY_ENV: &str = "NEWSAPI_KEY";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CACHE_DIR: &str = "raw/api_cache";
pub const DEFAULT_ARTICLES_DIR: &str = "raw/articles";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn default_endpoint() -> String {
    NEWSAPI_BASE_URL.to_string()
}

pub fn default_categories() -> Vec<String> {
    NEWS_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

pub fn default_target_total() -> usize {
    API_LIMIT
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::*;
    use chrono::NaiveDate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "news-fetch")]
    #[command(about = "Fetch today's top headlines from NewsAPI into a local article corpus")]
    pub struct CliConfig {
        #[arg(long, default_value = NEWSAPI_BASE_URL)]
        pub api_endpoint: String,

        /// Falls back to the NEWSAPI_KEY environment variable
        #[arg(long)]
        pub api_key: Option<String>,

        #[arg(
            long,
            value_delimiter = ',',
            default_value = "business,entertainment,general,health,science,sports,technology"
        )]
        pub categories: Vec<String>,

        #[arg(long, default_value_t = API_LIMIT)]
        pub target_total: usize,

        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        pub data_dir: String,

        #[arg(long, default_value = DEFAULT_CACHE_DIR)]
        pub cache_dir: String,

        #[arg(long, default_value = DEFAULT_ARTICLES_DIR)]
        pub articles_dir: String,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        pub timeout_seconds: u64,

        /// Run date (YYYY-MM-DD) used for cache keys and the output folder
        #[arg(long)]
        pub date: Option<NaiveDate>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log process CPU and memory per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 未指定 --api-key 時改用環境變數
        pub fn with_env_api_key(mut self) -> Self {
            if self.api_key.is_none() {
                self.api_key = std::env::var(API_KEY_ENV).ok();
            }
            self
        }
    }

    impl ConfigProvider for CliConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn api_key(&self) -> &str {
            self.api_key.as_deref().unwrap_or_default()
        }

        fn categories(&self) -> &[String] {
            &self.categories
        }

        fn target_total(&self) -> usize {
            self.target_total
        }

        fn cache_dir(&self) -> &str {
            &self.cache_dir
        }

        fn articles_dir(&self) -> &str {
            &self.articles_dir
        }

        fn request_timeout_secs(&self) -> u64 {
            self.timeout_seconds
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("api_endpoint", &self.api_endpoint)?;
            let api_key = validate_required_field("api_key", &self.api_key)?;
            validate_api_key("api_key", api_key)?;
            validate_categories("categories", &self.categories)?;
            validate_range("target_total", self.target_total, 1, API_LIMIT)?;
            validate_path("data_dir", &self.data_dir)?;
            validate_path("cache_dir", &self.cache_dir)?;
            validate_path("articles_dir", &self.articles_dir)?;
            validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::utils::error::IngestError;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["news-fetch", "--api-key", "k"]);
            assert_eq!(config.api_endpoint, NEWSAPI_BASE_URL);
            assert_eq!(config.categories, default_categories());
            assert_eq!(config.target_total, 100);
            assert_eq!(config.data_dir, "data");
            assert_eq!(config.cache_dir(), "raw/api_cache");
            assert_eq!(config.articles_dir(), "raw/articles");
            assert!(config.date.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_parses_categories_and_date() {
            let config = CliConfig::parse_from([
                "news-fetch",
                "--api-key",
                "k",
                "--categories",
                "science,technology",
                "--target-total",
                "20",
                "--date",
                "2024-05-17",
            ]);
            assert_eq!(config.categories, vec!["science", "technology"]);
            assert_eq!(config.target_total, 20);
            assert_eq!(config.date, NaiveDate::from_ymd_opt(2024, 5, 17));
        }

        #[test]
        fn test_missing_api_key_fails_validation() {
            let mut config = CliConfig::parse_from(["news-fetch"]);
            config.api_key = None;
            assert!(matches!(
                config.validate(),
                Err(IngestError::MissingConfigError { .. })
            ));
        }

        #[test]
        fn test_target_over_api_limit_fails_validation() {
            let config =
                CliConfig::parse_from(["news-fetch", "--api-key", "k", "--target-total", "150"]);
            assert!(config.validate().is_err());
        }
    }
}
