use chrono::{Local, NaiveDate, TimeZone};

use crate::models::{Category, CategoryFilter, ChatThread};

/// The sidebar's current view: a category tag plus free-text search.
#[derive(Debug, Clone, Default)]
pub struct ThreadFilter {
    pub category: CategoryFilter,
    search: String,
}

impl ThreadFilter {
    pub fn new(category: CategoryFilter, search: &str) -> Self {
        Self {
            category,
            search: search.to_lowercase(),
        }
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_lowercase();
    }

    pub fn matches(&self, thread: &ChatThread) -> bool {
        self.category.accepts(thread.category)
            && (self.search.is_empty() || thread.mentions(&self.search))
    }

    pub fn apply<'a>(&self, threads: &'a [ChatThread]) -> Vec<&'a ChatThread> {
        threads.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Threads sharing a date label, in the order they were encountered.
#[derive(Debug)]
pub struct DateGroup<'a> {
    pub label: String,
    pub threads: Vec<&'a ChatThread>,
}

/// "Today", "Yesterday", or a short calendar date for a thread id read as a
/// local timestamp in milliseconds.
pub fn date_label(id: i64, today: NaiveDate) -> String {
    let Some(created) = Local.timestamp_millis_opt(id).single() else {
        return "Unknown date".to_string();
    };
    let date = created.date_naive();

    if date == today {
        "Today".to_string()
    } else if Some(date) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

pub fn group_by_date<'a>(threads: &[&'a ChatThread], today: NaiveDate) -> Vec<DateGroup<'a>> {
    let mut groups: Vec<DateGroup<'a>> = Vec::new();
    for &thread in threads {
        let label = date_label(thread.id, today);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.threads.push(thread),
            None => groups.push(DateGroup {
                label,
                threads: vec![thread],
            }),
        }
    }
    groups
}

/// Number of threads shown next to a category tag.
pub fn category_count(threads: &[ChatThread], filter: CategoryFilter) -> usize {
    match filter {
        CategoryFilter::All => threads.len(),
        CategoryFilter::Only(c) => threads
            .iter()
            .filter(|t| t.category == Some(c))
            .count(),
    }
}

/// Title for a thread created from the sidebar under `category`.
pub fn new_thread_title(category: Category) -> String {
    format!("New {} Chat", category.display_name())
}
