use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// NewsAPI 回傳的單篇文章，原樣保留 API 給的所有欄位
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article {
    fields: Map<String, Value>,
}

impl Article {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn source_name(&self) -> Option<&str> {
        self.fields
            .get("source")
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewsApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub file_stem: String,
    pub article: Article,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub unique_articles: Vec<StoredArticle>,
    pub duplicates: usize,
}
