use serde::Deserialize;

use crate::models::SearchResult;

#[derive(Debug, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Vec<CseItem>,
    pub error: Option<CseError>,
}

#[derive(Debug, Deserialize)]
pub struct CseItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
    pub pagemap: Option<CsePagemap>,
}

#[derive(Debug, Deserialize)]
pub struct CsePagemap {
    #[serde(default)]
    pub cse_image: Vec<CseImage>,
}

#[derive(Debug, Deserialize)]
pub struct CseImage {
    pub src: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CseError {
    pub message: Option<String>,
}

impl From<CseItem> for SearchResult {
    fn from(item: CseItem) -> Self {
        let image = item
            .pagemap
            .and_then(|p| p.cse_image.into_iter().next())
            .and_then(|img| img.src);
        SearchResult {
            title: item.title,
            snippet: item.snippet,
            link: item.link,
            image,
        }
    }
}
