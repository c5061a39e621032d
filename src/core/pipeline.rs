use crate::core::allocation::allocate_articles;
use crate::core::cache::{to_indented_json, ResponseCache};
use crate::core::news_client::NewsApiClient;
use crate::core::{Article, ConfigProvider, Pipeline, StoredArticle, Storage, TransformResult};
use crate::utils::error::{IngestError, Result};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const TITLE_STEM_LEN: usize = 50;

/// 依分類抓取頭條、以 URL 去重，並逐篇寫成 JSON
pub struct NewsPipeline<S: Storage + Clone, C: ConfigProvider> {
    storage: S,
    config: C,
    client: NewsApiClient<S>,
    run_date: NaiveDate,
    allocation: Option<Vec<usize>>,
}

impl<S: Storage + Clone, C: ConfigProvider> NewsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let cache = ResponseCache::new(storage.clone(), config.cache_dir());
        let client = NewsApiClient::new(
            config.api_endpoint(),
            config.api_key(),
            config.request_timeout_secs(),
            cache,
        )?;

        Ok(Self {
            storage,
            config,
            client,
            run_date: chrono::Local::now().date_naive(),
            allocation: None,
        })
    }

    /// 快取鍵與輸出目錄都以這個日期命名
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.run_date = date;
        self
    }

    /// 固定每個分類的文章數，略過隨機分配
    pub fn with_allocation(mut self, allocation: Vec<usize>) -> Self {
        self.allocation = Some(allocation);
        self
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    pub fn output_dir(&self) -> String {
        format!(
            "{}/{}",
            self.config.articles_dir().trim_end_matches('/'),
            self.run_date.format("%Y-%m-%d")
        )
    }

    pub fn resolve_allocation(&self) -> Result<Vec<usize>> {
        let categories = self.config.categories();
        match &self.allocation {
            Some(allocation) if allocation.len() != categories.len() => {
                Err(IngestError::ValidationError {
                    message: format!(
                        "Allocation has {} entries but {} categories are configured",
                        allocation.len(),
                        categories.len()
                    ),
                })
            }
            Some(allocation) => Ok(allocation.clone()),
            None => allocate_articles(
                categories.len(),
                self.config.target_total(),
                &mut rand::thread_rng(),
            ),
        }
    }
}

/// 有 URL 用 SHA-256，否則用標題前 50 字，再否則 `untitled_{n}`
pub fn article_file_stem(article: &Article, unique_count: usize) -> String {
    if let Some(url) = article.url().filter(|u| !u.is_empty()) {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        return hex::encode(hasher.finalize());
    }

    if let Some(title) = article.title().filter(|t| !t.trim().is_empty()) {
        return title
            .chars()
            .take(TITLE_STEM_LEN)
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
                c => c,
            })
            .collect();
    }

    format!("untitled_{}", unique_count)
}

/// 截斷或替換字元後可能撞名，撞名時加上 `_2`、`_3`…
fn claim_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn dedupe_key(article: &Article) -> Option<String> {
    if let Some(url) = article.url().filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    article
        .title()
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("title:{}", t))
}

#[async_trait::async_trait]
impl<S: Storage + Clone, C: ConfigProvider> Pipeline for NewsPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Article>> {
        let allocation = self.resolve_allocation()?;
        tracing::info!("🎲 Articles per category: {:?}", allocation);

        let mut articles = Vec::new();
        for (category, &page_size) in self.config.categories().iter().zip(allocation.iter()) {
            if page_size == 0 {
                tracing::debug!("⏭️ {}: no articles allocated, skipping", category);
                continue;
            }

            match self
                .client
                .fetch_single_query(category, page_size, self.run_date)
                .await?
            {
                Some(data) => {
                    tracing::info!("📰 {}: {} articles", category, data.articles.len());
                    articles.extend(data.articles);
                }
                None => tracing::warn!("⚠️ {}: no data, continuing", category),
            }
        }

        Ok(articles)
    }

    async fn transform(&self, articles: Vec<Article>) -> Result<TransformResult> {
        let mut seen = HashSet::new();
        let mut used_stems = HashSet::new();
        let mut unique_articles = Vec::new();
        let mut duplicates = 0;

        for article in articles {
            if let Some(key) = dedupe_key(&article) {
                if !seen.insert(key) {
                    duplicates += 1;
                    continue;
                }
            }

            let file_stem = claim_stem(
                article_file_stem(&article, unique_articles.len() + 1),
                &mut used_stems,
            );
            unique_articles.push(StoredArticle { file_stem, article });
        }

        Ok(TransformResult {
            unique_articles,
            duplicates,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_dir = self.output_dir();

        for stored in &result.unique_articles {
            let path = format!("{}/{}.json", output_dir, stored.file_stem);
            let data = to_indented_json(&stored.article)?;
            self.storage.write_file(&path, &data).await?;
        }

        tracing::info!(
            "✅ Finished fetching. Total unique articles collected: {}",
            result.unique_articles.len()
        );
        Ok(output_dir)
    }
}
