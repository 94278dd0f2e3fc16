use crate::models::SearchResult;

pub const NO_RESULTS_MESSAGE: &str =
    "I couldn't find any results for that query. Could you try rephrasing it?";
pub const SUMMARY_INTRO: &str = "Here's what I found:";
pub const FOLLOW_UP_PROMPT: &str =
    "Would you like me to search for anything specific about this topic?";

const MAX_SUMMARY_RESULTS: usize = 3;

const TITLE_MARKER: &str = "📌";
const LINK_MARKER: &str = "🔗";
const IMAGE_MARKER: &str = "🖼️";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Raw ranked results, one block per hit.
    Search,
    /// Short numbered summary of the top hits.
    Conversational,
}

/// Render search hits as the text stored in an assistant message.
pub fn format_results(results: &[SearchResult], mode: ResponseMode) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }
    match mode {
        ResponseMode::Search => format_result_list(results),
        ResponseMode::Conversational => format_summary(results),
    }
}

fn format_result_list(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            let mut block = format!(
                "{} {}\n{}\n{} {}",
                TITLE_MARKER, r.title, r.snippet, LINK_MARKER, r.link
            );
            if let Some(image) = &r.image {
                block.push_str(&format!("\n{} {}", IMAGE_MARKER, image));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_summary(results: &[SearchResult]) -> String {
    let items = results
        .iter()
        .take(MAX_SUMMARY_RESULTS)
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n{}\n{}", i + 1, r.title, r.snippet, r.link))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n\n{}\n\n{}", SUMMARY_INTRO, items, FOLLOW_UP_PROMPT)
}

/// One line of a rendered search-mode result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLine {
    Title(String),
    Link(String),
    Image(String),
    Text(String),
}

/// Split search-mode message content back into blocks of typed lines.
pub fn parse_result_blocks(content: &str) -> Vec<Vec<ResultLine>> {
    content
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| block.lines().map(classify_line).collect())
        .collect()
}

fn classify_line(line: &str) -> ResultLine {
    if let Some(rest) = line.strip_prefix(TITLE_MARKER) {
        ResultLine::Title(rest.trim_start().to_string())
    } else if let Some(rest) = line.strip_prefix(LINK_MARKER) {
        ResultLine::Link(rest.trim_start().to_string())
    } else if let Some(rest) = line.strip_prefix(IMAGE_MARKER) {
        ResultLine::Image(rest.trim_start().to_string())
    } else {
        ResultLine::Text(line.to_string())
    }
}
