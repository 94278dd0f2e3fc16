use anyhow::{Context, Result};

use super::database::Database;
use crate::models::ChatThread;

pub const CHATS_KEY: &str = "chats";

/// Reads and writes the whole thread list as one serialized value.
pub struct HistoryService;

impl HistoryService {
    pub async fn load(db: &Database) -> Result<Vec<ChatThread>> {
        let Some(json) = db.get_value(CHATS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&json) {
            Ok(threads) => Ok(threads),
            Err(e) => {
                tracing::warn!("Discarding unreadable chat history: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(db: &Database, threads: &[ChatThread]) -> Result<()> {
        let json = serde_json::to_string(threads).context("Failed to serialize chat history")?;
        db.set_value(CHATS_KEY, &json).await
    }

    pub async fn clear(db: &Database) -> Result<()> {
        db.remove_value(CHATS_KEY).await
    }

    /// Persist `threads`, or drop the stored copy entirely once nothing is left.
    pub async fn sync(db: &Database, threads: &[ChatThread]) -> Result<()> {
        if threads.is_empty() {
            Self::clear(db).await
        } else {
            Self::save(db, threads).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Message};

    fn sample_threads() -> Vec<ChatThread> {
        let mut first = ChatThread::new(1_760_000_000_000);
        first.title = "Trip Planning".to_string();
        first.category = Some(Category::Personal);
        first.messages.push(Message::user("/search lisbon hotels"));
        first
            .messages
            .push(Message::reply("📌 Hotel\nNice\n🔗 https://example.com", true));

        let mut second = ChatThread::new(1_760_000_000_001);
        second.messages.push(Message::user("rust"));
        second.messages.push(Message::error("Error: Network error: timed out"));

        vec![first, second]
    }

    #[tokio::test]
    async fn test_absent_history_is_empty() {
        let db = Database::new_in_memory().unwrap();
        assert!(HistoryService::load(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_threads() {
        let db = Database::new_in_memory().unwrap();
        let threads = sample_threads();

        HistoryService::save(&db, &threads).await.unwrap();
        let loaded = HistoryService::load(&db).await.unwrap();

        assert_eq!(loaded, threads);
    }

    #[tokio::test]
    async fn test_stored_format_matches_key_value_layout() {
        let db = Database::new_in_memory().unwrap();
        HistoryService::save(&db, &sample_threads()).await.unwrap();

        let raw = db.get_value(CHATS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1_760_000_000_000_i64);
        assert_eq!(value[0]["category"], "personal");
        assert_eq!(value[0]["messages"][1]["isSearchResult"], true);
        assert!(value[1].get("category").is_none());
        assert_eq!(value[1]["messages"][1]["isError"], true);
    }

    #[tokio::test]
    async fn test_corrupt_history_loads_empty() {
        let db = Database::new_in_memory().unwrap();
        db.set_value(CHATS_KEY, "{not json").await.unwrap();
        assert!(HistoryService::load(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sync_of_empty_list_removes_key() {
        let db = Database::new_in_memory().unwrap();
        HistoryService::sync(&db, &sample_threads()).await.unwrap();
        assert!(db.get_value(CHATS_KEY).await.unwrap().is_some());

        HistoryService::sync(&db, &[]).await.unwrap();
        assert!(db.get_value(CHATS_KEY).await.unwrap().is_none());
    }
}
