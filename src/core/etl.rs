use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct IngestEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> IngestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract → transform → load，回傳文章輸出目錄
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting news ingestion");
        self.monitor.log_phase("Start");

        // Extract
        let articles = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} articles", articles.len());
        self.monitor.log_phase("Extract");

        // Transform
        let result = self.pipeline.transform(articles).await?;
        tracing::info!(
            "🔄 {} unique articles ({} duplicates dropped)",
            result.unique_articles.len(),
            result.duplicates
        );
        self.monitor.log_phase("Transform");

        // Load
        let output_dir = self.pipeline.load(result).await?;
        tracing::info!("📁 Articles saved to: {}", output_dir);
        self.monitor.log_phase("Load");
        self.monitor.log_final_stats();

        Ok(output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Article, StoredArticle, TransformResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Vec<Article>> {
            self.calls.lock().unwrap().push("extract".to_string());
            Ok(vec![Article::default(), Article::default()])
        }

        async fn transform(&self, articles: Vec<Article>) -> Result<TransformResult> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("transform:{}", articles.len()));
            Ok(TransformResult {
                unique_articles: articles
                    .into_iter()
                    .map(|article| StoredArticle {
                        file_stem: "x".to_string(),
                        article,
                    })
                    .collect(),
                duplicates: 0,
            })
        }

        async fn load(&self, result: TransformResult) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("load:{}", result.unique_articles.len()));
            Ok("out".to_string())
        }
    }

    #[tokio::test]
    async fn test_engine_runs_phases_in_order() {
        let engine = IngestEngine::new(RecordingPipeline::default());
        let output = engine.run().await.unwrap();

        assert_eq!(output, "out");
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform:2", "load:2"]
        );
    }
}
