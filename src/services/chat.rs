use std::sync::Arc;

use crate::models::Message;
use crate::providers::{SearchError, SearchProvider};
use crate::services::format::{format_results, ResponseMode};

const SEARCH_COMMAND: &str = "/search";
const TITLE_MAX_CHARS: usize = 30;

/// A user message after command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: ResponseMode,
}

impl SearchRequest {
    /// A leading `/search` (any case) asks for raw results; the query is
    /// whatever follows it. Anything else is summarized.
    pub fn from_input(text: &str) -> Self {
        let is_command = text
            .get(..SEARCH_COMMAND.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SEARCH_COMMAND));

        if is_command {
            Self {
                query: text[SEARCH_COMMAND.len()..].trim().to_string(),
                mode: ResponseMode::Search,
            }
        } else {
            Self {
                query: text.to_string(),
                mode: ResponseMode::Conversational,
            }
        }
    }
}

/// Run one search and turn the outcome into the assistant message to append.
/// Failures become error messages, so this never fails.
pub async fn run_search(
    provider: Option<Arc<dyn SearchProvider>>,
    request: SearchRequest,
) -> Message {
    match search(provider, &request).await {
        Ok(content) => Message::reply(content, request.mode == ResponseMode::Search),
        Err(e) => {
            tracing::warn!("Search failed: {}", e);
            Message::error(format!("Error: {}", e))
        }
    }
}

async fn search(
    provider: Option<Arc<dyn SearchProvider>>,
    request: &SearchRequest,
) -> Result<String, SearchError> {
    let provider = provider.ok_or_else(|| {
        SearchError::NotConfigured(format!(
            "set {} and {}",
            crate::config::API_KEY_VAR,
            crate::config::ENGINE_ID_VAR
        ))
    })?;

    if request.query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    tracing::info!(provider = provider.name(), mode = ?request.mode, "Searching");
    let response = provider.search(&request.query).await?;
    Ok(format_results(&response.results, request.mode))
}

/// Thread title derived from the first query of a conversation.
pub fn truncate_title(query: &str) -> String {
    let first_line = query.lines().next().unwrap_or(query).trim();
    if first_line.chars().count() > TITLE_MAX_CHARS {
        let head: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::SearchResult;
    use crate::providers::SearchResponse;
    use crate::services::format::NO_RESULTS_MESSAGE;

    /// Records every query and replies with a canned outcome.
    struct FakeProvider {
        queries: Mutex<Vec<String>>,
        outcome: fn() -> Result<SearchResponse, SearchError>,
    }

    impl FakeProvider {
        fn new(outcome: fn() -> Result<SearchResponse, SearchError>) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                outcome,
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            (self.outcome)()
        }
    }

    fn five_hits() -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse {
            results: (1..=5)
                .map(|n| SearchResult {
                    title: format!("Cat fact {n}"),
                    snippet: format!("Snippet {n}"),
                    link: format!("https://cats.example/{n}"),
                    image: None,
                })
                .collect(),
        })
    }

    fn no_hits() -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse::default())
    }

    fn quota_exceeded() -> Result<SearchResponse, SearchError> {
        Err(SearchError::Api("quota exceeded".to_string()))
    }

    #[test]
    fn test_search_command_parsing() {
        let request = SearchRequest::from_input("/search cats");
        assert_eq!(request.query, "cats");
        assert_eq!(request.mode, ResponseMode::Search);

        let request = SearchRequest::from_input("/SEARCH   cats  ");
        assert_eq!(request.query, "cats");
        assert_eq!(request.mode, ResponseMode::Search);

        let request = SearchRequest::from_input("cats /search");
        assert_eq!(request.query, "cats /search");
        assert_eq!(request.mode, ResponseMode::Conversational);
    }

    #[test]
    fn test_short_and_multibyte_input() {
        assert_eq!(
            SearchRequest::from_input("/se").mode,
            ResponseMode::Conversational
        );
        // Byte 7 falls inside a multibyte char
        assert_eq!(
            SearchRequest::from_input("ééééé").mode,
            ResponseMode::Conversational
        );
    }

    #[tokio::test]
    async fn test_search_mode_message() {
        let provider = FakeProvider::new(five_hits);
        let message = run_search(
            Some(provider.clone()),
            SearchRequest::from_input("/search cats"),
        )
        .await;

        assert_eq!(provider.queries(), vec!["cats".to_string()]);
        assert!(message.is_search_result());
        assert!(!message.is_error());
        assert!(message.content.contains("📌 Cat fact 5"));
    }

    #[tokio::test]
    async fn test_conversational_message_summarizes_three() {
        let provider = FakeProvider::new(five_hits);
        let message = run_search(Some(provider.clone()), SearchRequest::from_input("cats")).await;

        assert_eq!(provider.queries(), vec!["cats".to_string()]);
        assert!(!message.is_search_result());
        assert!(message.content.contains("3. Cat fact 3"));
        assert!(!message.content.contains("Cat fact 4"));
    }

    #[tokio::test]
    async fn test_no_results_regardless_of_mode() {
        for input in ["/search cats", "cats"] {
            let provider = FakeProvider::new(no_hits);
            let message = run_search(Some(provider), SearchRequest::from_input(input)).await;
            assert_eq!(message.content, NO_RESULTS_MESSAGE);
            assert!(!message.is_error());
        }
    }

    #[tokio::test]
    async fn test_api_error_becomes_error_message() {
        let provider = FakeProvider::new(quota_exceeded);
        let message = run_search(Some(provider), SearchRequest::from_input("cats")).await;

        assert!(message.is_error());
        assert!(message.content.contains("quota exceeded"));
        assert!(message.content.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_empty_query_skips_provider() {
        let provider = FakeProvider::new(five_hits);
        let message =
            run_search(Some(provider.clone()), SearchRequest::from_input("/search   ")).await;

        assert!(provider.queries().is_empty());
        assert!(message.is_error());
        assert_eq!(message.content, "Error: Search query is empty");
    }

    #[tokio::test]
    async fn test_missing_provider_names_variables() {
        let message = run_search(None, SearchRequest::from_input("cats")).await;
        assert!(message.is_error());
        assert!(message.content.contains("GOOGLE_API_KEY"));
        assert!(message.content.contains("SEARCH_ENGINE_ID"));
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("cats"), "cats");
        assert_eq!(
            truncate_title("what is the best way to plan a trip to lisbon"),
            "what is the best way to plan a..."
        );
        assert_eq!(truncate_title("first line\nsecond line"), "first line");
    }
}
