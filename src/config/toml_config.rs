use crate::config::{
    default_categories, default_endpoint, default_target_total, DEFAULT_ARTICLES_DIR,
    DEFAULT_CACHE_DIR, DEFAULT_DATA_DIR, DEFAULT_TIMEOUT_SECS,
};
use crate::core::allocation::API_LIMIT;
use crate::core::ConfigProvider;
use crate::utils::error::{IngestError, Result};
use crate::utils::validation::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_target_total")]
    pub target_total: usize,
    /// 固定每個分類的數量，與 categories 一一對應
    pub allocation: Option<Vec<usize>>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            target_total: default_target_total(),
            allocation: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub cache_dir: String,
    pub articles_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            articles_dir: DEFAULT_ARTICLES_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IngestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NEWSAPI_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IngestError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    pub fn allocation(&self) -> Option<&[usize]> {
        self.fetch.allocation.as_deref()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn api_key(&self) -> &str {
        self.source.api_key.as_deref().unwrap_or_default()
    }

    fn categories(&self) -> &[String] {
        &self.fetch.categories
    }

    fn target_total(&self) -> usize {
        self.fetch.target_total
    }

    fn cache_dir(&self) -> &str {
        &self.storage.cache_dir
    }

    fn articles_dir(&self) -> &str {
        &self.storage.articles_dir
    }

    fn request_timeout_secs(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.endpoint", &self.source.endpoint)?;
        let api_key = validate_required_field("source.api_key", &self.source.api_key)?;
        validate_api_key("source.api_key", api_key)?;
        validate_range("source.timeout_seconds", self.request_timeout_secs(), 1, 300)?;

        validate_categories("fetch.categories", &self.fetch.categories)?;
        validate_range("fetch.target_total", self.fetch.target_total, 1, API_LIMIT)?;

        if let Some(allocation) = &self.fetch.allocation {
            if allocation.len() != self.fetch.categories.len() {
                return Err(IngestError::ConfigValidationError {
                    field: "fetch.allocation".to_string(),
                    message: format!(
                        "Expected {} entries (one per category), got {}",
                        self.fetch.categories.len(),
                        allocation.len()
                    ),
                });
            }
            let total: usize = allocation.iter().sum();
            validate_range("fetch.allocation", total, 1, API_LIMIT)?;
        }

        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_path("storage.cache_dir", &self.storage.cache_dir)?;
        validate_path("storage.articles_dir", &self.storage.articles_dir)?;

        tracing::debug!("✅ TOML configuration validation passed");
        Ok(())
    }
}
