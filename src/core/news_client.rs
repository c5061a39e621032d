use crate::core::cache::ResponseCache;
use crate::core::{NewsApiResponse, Storage};
use crate::utils::error::{IngestError, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// `top-headlines` 用戶端，先查快取再打 API
pub struct NewsApiClient<S: Storage> {
    client: Client,
    endpoint: String,
    api_key: String,
    cache: ResponseCache<S>,
}

impl<S: Storage> NewsApiClient<S> {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        cache: ResponseCache<S>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            cache,
        })
    }

    /// 取得單一分類的頭條。
    ///
    /// 快取命中時不發送請求。HTTP 失敗或 API 回報錯誤時回傳 `Ok(None)`，
    /// 只有快取寫入失敗會以錯誤傳遞。
    pub async fn fetch_single_query(
        &self,
        category: &str,
        page_size: usize,
        date: NaiveDate,
    ) -> Result<Option<NewsApiResponse>> {
        let cache_key = ResponseCache::<S>::cache_key(date, category, page_size);
        if let Some(cached) = self.cache.load(&cache_key).await? {
            tracing::info!("📂 {}: using cached response ({})", category, cache_key);
            return Ok(Some(cached));
        }

        match self.request(category, page_size).await {
            Ok(data) => {
                self.cache.save(&cache_key, &data).await?;
                Ok(Some(data))
            }
            Err(e @ IngestError::ApiStatusError { .. }) => {
                tracing::warn!("⚠️ {}: API error: {}", category, e);
                Ok(None)
            }
            Err(e @ IngestError::ApiError(_)) => {
                tracing::warn!("⚠️ {}: request failed: {}", category, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn request(&self, category: &str, page_size: usize) -> Result<NewsApiResponse> {
        tracing::debug!(
            "📡 GET {} category={} pageSize={}",
            self.endpoint,
            category,
            page_size
        );

        let page_size = page_size.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("category", category), ("pageSize", page_size.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let data: NewsApiResponse = response.json().await?;
        if !data.is_ok() {
            return Err(IngestError::ApiStatusError {
                status: data.status,
                code: data.code.unwrap_or_else(|| "unknown".to_string()),
                message: data.message.unwrap_or_default(),
            });
        }

        tracing::debug!(
            "📡 {}: received {} articles",
            category,
            data.articles.len()
        );
        Ok(data)
    }
}
