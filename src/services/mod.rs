pub mod chat;
pub mod database;
pub mod filter;
pub mod format;
pub mod history;
pub mod store;

pub use database::Database;
pub use history::HistoryService;
pub use store::ChatStore;
