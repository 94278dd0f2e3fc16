pub mod category;
pub mod message;
pub mod search_result;
pub mod thread;

pub use category::{Category, CategoryFilter};
pub use message::{Message, Role};
pub use search_result::SearchResult;
pub use thread::{ChatThread, ThreadId, DEFAULT_TITLE};
