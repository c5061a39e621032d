use crate::core::{NewsApiResponse, Storage};
use crate::utils::error::{IngestError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// 以四格縮排輸出 JSON，非 ASCII 字元不跳脫
pub fn to_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// 每日 API 回應快取，檔名為 `{date}_{category}_{page_size}.json`
#[derive(Debug, Clone)]
pub struct ResponseCache<S: Storage> {
    storage: S,
    cache_dir: String,
}

impl<S: Storage> ResponseCache<S> {
    pub fn new(storage: S, cache_dir: impl Into<String>) -> Self {
        Self {
            storage,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_key(date: NaiveDate, category: &str, page_size: usize) -> String {
        let safe_category: String = category
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}_{}.json", date.format("%Y-%m-%d"), safe_category, page_size)
    }

    pub fn path_for(&self, key: &str) -> String {
        format!("{}/{}", self.cache_dir.trim_end_matches('/'), key)
    }

    pub async fn save(&self, key: &str, response: &NewsApiResponse) -> Result<()> {
        let path = self.path_for(key);
        tracing::debug!("💾 Saving to cache: {}", path);
        let data = to_indented_json(response)?;
        self.storage.write_file(&path, &data).await
    }

    pub async fn load(&self, key: &str) -> Result<Option<NewsApiResponse>> {
        let path = self.path_for(key);
        let data = match self.storage.read_file(&path).await {
            Ok(data) => data,
            Err(IngestError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<NewsApiResponse>(&data) {
            Ok(response) => {
                tracing::debug!("📂 Loading from cache: {}", path);
                Ok(Some(response))
            }
            Err(e) => {
                tracing::warn!("⚠️ Ignoring unreadable cache file {}: {}", path, e);
                Ok(None)
            }
        }
    }
}
