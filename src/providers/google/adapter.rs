use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::models::CseResponse;
use crate::config::SearchConfig;
use crate::models::SearchResult;
use crate::providers::traits::SearchProvider;
use crate::providers::types::{SearchError, SearchResponse};

const CHECK_QUERY: &str = "test";

pub struct GoogleSearchProvider {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl GoogleSearchProvider {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    fn request_url(&self, query: &str) -> Result<Url, SearchError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ],
        )
        .map_err(|e| SearchError::NotConfigured(format!("invalid endpoint: {}", e)))
    }

    /// Pull the provider's message out of an error body, falling back to the
    /// HTTP reason phrase.
    fn parse_error_message(status: reqwest::StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(msg) = parsed["error"]["message"].as_str() {
                return msg.to_string();
            }
        }
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    }

    /// Issue a throwaway query to verify the key and engine id.
    pub async fn check_connection(&self) -> Result<(), SearchError> {
        self.search(CHECK_QUERY).await.map(|_| ())
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let url = self.request_url(query)?;
        tracing::debug!(query, "Sending search request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(Self::parse_error_message(status, &body)));
        }

        let parsed: CseResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(SearchError::Api(
                error.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let results: Vec<SearchResult> =
            parsed.items.into_iter().map(SearchResult::from).collect();
        tracing::debug!(count = results.len(), "Search request finished");

        Ok(SearchResponse { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn provider_for(endpoint: String) -> GoogleSearchProvider {
        GoogleSearchProvider::new(&SearchConfig {
            api_key: "test-key".to_string(),
            engine_id: "test-engine".to_string(),
            endpoint,
        })
    }

    #[tokio::test]
    async fn test_search_maps_items() {
        let mut server = Server::new_async().await;
        let body = r#"{
            "items": [
                {
                    "title": "Cats - Wikipedia",
                    "snippet": "The cat is a small domesticated carnivore.",
                    "link": "https://en.wikipedia.org/wiki/Cat",
                    "pagemap": { "cse_image": [ { "src": "https://upload.example/cat.jpg" } ] }
                },
                {
                    "title": "Cat care",
                    "snippet": "How to look after a cat.",
                    "link": "https://example.org/care"
                }
            ]
        }"#;

        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("cx".into(), "test-engine".into()),
                Matcher::UrlEncoded("q".into(), "cats & dogs".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        let response = provider.search("cats & dogs").await.unwrap();
        mock.assert_async().await;

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].title, "Cats - Wikipedia");
        assert_eq!(
            response.results[0].image.as_deref(),
            Some("https://upload.example/cat.jpg")
        );
        assert_eq!(response.results[1].link, "https://example.org/care");
        assert!(response.results[1].image.is_none());
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"kind": "customsearch#search"}"#)
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        let response = provider.search("nothing here").await.unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_carries_provider_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 429, "message": "quota exceeded"}}"#)
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        match provider.search("cats").await {
            Err(SearchError::Api(message)) => assert_eq!(message, "quota exceeded"),
            other => panic!("Expected Api error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_falls_back_to_status_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("not json")
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        match provider.search("cats").await {
            Err(SearchError::Api(message)) => assert_eq!(message, "Forbidden"),
            other => panic!("Expected Api error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_object_in_success_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Invalid Value"}}"#)
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        let err = provider.search("cats").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch search results: Invalid Value"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        assert!(matches!(
            provider.search("cats").await,
            Err(SearchError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let provider = provider_for("http://127.0.0.1:1/customsearch/v1".to_string());
        assert!(matches!(
            provider.search("cats").await,
            Err(SearchError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_check_connection_sends_fixed_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::UrlEncoded("q".into(), "test".into()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let provider = provider_for(format!("{}/customsearch/v1", server.url()));
        provider.check_connection().await.unwrap();
        mock.assert_async().await;
    }
}
