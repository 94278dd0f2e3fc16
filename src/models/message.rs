use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of a thread's message log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_search_result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            is_search_result: None,
            is_error: None,
        }
    }

    pub fn reply(content: impl Into<String>, is_search_result: bool) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_search_result: Some(is_search_result),
            is_error: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_search_result: None,
            is_error: Some(true),
        }
    }

    pub fn is_search_result(&self) -> bool {
        self.is_search_result.unwrap_or(false)
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}
