use clap::Parser;
use news_recommender::utils::error::{ErrorSeverity, IngestError};
use news_recommender::utils::{logger, validation::Validate};
use news_recommender::{CliConfig, IngestEngine, LocalStorage, NewsPipeline};

fn exit_code(e: &IngestError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &IngestError) {
    tracing::error!(
        "❌ News ingestion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse().with_env_api_key();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting news-fetch");
    if config.verbose {
        tracing::debug!(
            "Endpoint: {}, categories: {:?}, target: {}, data dir: {}",
            config.api_endpoint,
            config.categories,
            config.target_total,
            config.data_dir
        );
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report(&e);
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.data_dir.clone());
    let saved_root = storage.clone();
    let run_date = config.date;
    let mut pipeline = match NewsPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e));
        }
    };
    if let Some(date) = run_date {
        pipeline = pipeline.with_date(date);
    }

    let engine = IngestEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_dir) => {
            tracing::info!("✅ News ingestion completed successfully!");
            println!(
                "✅ Articles saved under: {}",
                saved_root.resolve(&output_dir).display()
            );
        }
        Err(e) => {
            report(&e);
            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
