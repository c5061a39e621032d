#![cfg(feature = "cli")]

use chrono::NaiveDate;
use clap::Parser;
use httpmock::prelude::*;
use news_recommender::{CliConfig, IngestEngine, LocalStorage, NewsPipeline};
use tempfile::TempDir;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn cli_config(endpoint: &str, data_dir: &str, categories: &str) -> CliConfig {
    CliConfig::parse_from([
        "news-fetch",
        "--api-endpoint",
        endpoint,
        "--api-key",
        "test_api_key",
        "--categories",
        categories,
        "--data-dir",
        data_dir,
    ])
}

#[tokio::test]
async fn test_end_to_end_fetch_dedupes_across_categories() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let business = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/top-headlines")
            .header("X-Api-Key", "test_api_key")
            .query_param("category", "business")
            .query_param("pageSize", "3");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "ok",
                "totalResults": 3,
                "articles": [
                    {"source": {"id": null, "name": "Wire"}, "title": "Markets rally", "url": "http://example.com/markets"},
                    {"source": {"id": null, "name": "Wire"}, "title": "Chip shortage", "url": "http://example.com/chips"},
                    {"source": {"id": null, "name": "Wire"}, "title": "Untracked", "url": null}
                ]
            }));
    });
    let technology = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/top-headlines")
            .query_param("category", "technology")
            .query_param("pageSize", "2");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {"title": "Chip shortage (tech desk)", "url": "http://example.com/chips"},
                    {"title": "New phone", "url": "http://example.com/phone"}
                ]
            }));
    });

    let config = cli_config(
        &server.url("/v2/top-headlines"),
        &data_dir,
        "business,technology",
    );
    let storage = LocalStorage::new(data_dir.clone());
    let pipeline = NewsPipeline::new(storage, config)
        .unwrap()
        .with_date(run_date())
        .with_allocation(vec![3, 2]);

    let engine = IngestEngine::new(pipeline);
    let output_dir = engine.run().await.unwrap();

    business.assert();
    technology.assert();
    assert_eq!(output_dir, "raw/articles/2024-05-17");

    // 4 unique articles: the shared chips URL is written once
    let article_dir = temp_dir.path().join("raw/articles/2024-05-17");
    let mut files: Vec<String> = std::fs::read_dir(&article_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files.len(), 4);
    assert!(files.contains(&"Untracked.json".to_string()));

    // First occurrence wins
    let chips: Vec<serde_json::Value> = files
        .iter()
        .map(|f| std::fs::read_to_string(article_dir.join(f)).unwrap())
        .map(|text| serde_json::from_str(&text).unwrap())
        .filter(|v: &serde_json::Value| v["url"] == "http://example.com/chips")
        .collect();
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0]["title"], "Chip shortage");

    // Both responses were cached
    let cache_dir = temp_dir.path().join("raw/api_cache");
    assert!(cache_dir.join("2024-05-17_business_3.json").exists());
    assert!(cache_dir.join("2024-05-17_technology_2.json").exists());
}

#[tokio::test]
async fn test_second_run_same_day_uses_cache() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/top-headlines");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{"title": "Only story", "url": "http://example.com/only"}]
            }));
    });

    for _ in 0..2 {
        let config = cli_config(&server.url("/v2/top-headlines"), &data_dir, "science");
        let pipeline = NewsPipeline::new(LocalStorage::new(data_dir.clone()), config)
            .unwrap()
            .with_date(run_date())
            .with_allocation(vec![5]);
        IngestEngine::new(pipeline).run().await.unwrap();
    }

    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_end_to_end_with_api_failure_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/top-headlines");
        then.status(500);
    });

    let config = cli_config(&server.url("/v2/top-headlines"), &data_dir, "health,sports");
    let pipeline = NewsPipeline::new(LocalStorage::new(data_dir.clone()), config)
        .unwrap()
        .with_date(run_date())
        .with_allocation(vec![4, 6]);

    // Failed categories are skipped, the run itself still succeeds
    let result = IngestEngine::new(pipeline).run().await;
    assert!(result.is_ok());
    api_mock.assert_hits(2);

    assert!(!temp_dir.path().join("raw/api_cache").exists());
    assert!(!temp_dir.path().join("raw/articles/2024-05-17").exists());
}

#[tokio::test]
async fn test_end_to_end_with_random_allocation_and_monitoring() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/top-headlines");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"status": "ok", "totalResults": 0, "articles": []}));
    });

    let config = cli_config(
        &server.url("/v2/top-headlines"),
        &data_dir,
        "business,entertainment,general,health,science,sports,technology",
    );
    let pipeline = NewsPipeline::new(LocalStorage::new(data_dir.clone()), config)
        .unwrap()
        .with_date(run_date());
    let allocation = pipeline.resolve_allocation().unwrap();
    assert_eq!(allocation.iter().sum::<usize>(), 100);

    let engine = IngestEngine::new_with_monitoring(pipeline, true);
    assert!(engine.run().await.is_ok());
    assert!(api_mock.hits() >= 1);
}
