use crate::domain::model::{Article, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> &str;
    fn categories(&self) -> &[String];
    fn target_total(&self) -> usize;
    /// 相對於 Storage 根目錄
    fn cache_dir(&self) -> &str;
    fn articles_dir(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Article>>;
    async fn transform(&self, articles: Vec<Article>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
