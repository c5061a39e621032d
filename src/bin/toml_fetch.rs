use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use news_recommender::core::ConfigProvider;
use news_recommender::utils::error::ErrorSeverity;
use news_recommender::utils::{logger, validation::Validate};
use news_recommender::{IngestEngine, LocalStorage, NewsPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-fetch")]
#[command(about = "News ingestion driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "news-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the run date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Show the fetch plan without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose, config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let fixed_allocation = config.allocation().map(|a| a.to_vec());

    let storage = LocalStorage::new(config.data_dir().to_string());
    let saved_root = storage.clone();
    let mut pipeline = NewsPipeline::new(storage, config.clone())?;
    if let Some(date) = args.date {
        pipeline = pipeline.with_date(date);
    }
    if let Some(allocation) = fixed_allocation {
        pipeline = pipeline.with_allocation(allocation);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No API calls will be made");
        print_plan(&config, &pipeline)?;
        return Ok(());
    }

    let engine = IngestEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(output_dir) => {
            println!(
                "✅ Articles saved under: {}",
                saved_root.resolve(&output_dir).display()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ News ingestion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_plan(
    config: &TomlConfig,
    pipeline: &NewsPipeline<LocalStorage, TomlConfig>,
) -> anyhow::Result<()> {
    let allocation = pipeline.resolve_allocation()?;

    println!("📋 Fetch plan for {}", pipeline.run_date());
    println!("   Endpoint: {}", config.api_endpoint());
    println!("   Cache:    {}/{}", config.data_dir(), config.cache_dir());
    println!("   Output:   {}/{}", config.data_dir(), pipeline.output_dir());
    for (category, count) in config.categories().iter().zip(allocation.iter()) {
        println!("   {:<14} {:>3}", category, count);
    }
    println!("   {:<14} {:>3}", "total", allocation.iter().sum::<usize>());
    Ok(())
}
