/// A single hit returned by a search provider. Only its rendered text form is
/// ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub image: Option<String>,
}
