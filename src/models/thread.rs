use serde::{Deserialize, Serialize};

use super::category::Category;
use super::message::Message;

/// Creation timestamp in epoch milliseconds; doubles as the sort and
/// uniqueness key.
pub type ThreadId = i64;

pub const DEFAULT_TITLE: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatThread {
    pub id: ThreadId,
    pub title: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl ChatThread {
    pub fn new(id: ThreadId) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            category: None,
        }
    }

    /// Case-insensitive substring match against the title and every message.
    /// `needle` must already be lowercase.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}
