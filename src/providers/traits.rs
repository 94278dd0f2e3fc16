use async_trait::async_trait;

use super::types::{SearchError, SearchResponse};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}
