use thiserror::Error;

use crate::models::SearchResult;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to fetch search results: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Search is not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
