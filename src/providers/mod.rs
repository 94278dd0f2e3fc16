pub mod google;
pub mod traits;
pub mod types;

pub use google::GoogleSearchProvider;
pub use traits::SearchProvider;
pub use types::{SearchError, SearchResponse};
