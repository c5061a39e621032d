pub mod allocation;
pub mod cache;
pub mod etl;
pub mod news_client;
pub mod pipeline;

pub use crate::domain::model::{
    Article, NewsApiResponse, StoredArticle, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
