use serde::{Deserialize, Serialize};

/// A user-assigned tag on a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Study,
    Creative,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Study => "study",
            Category::Creative => "creative",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Study => "Study",
            Category::Creative => "Creative",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Work => "💼",
            Category::Personal => "👤",
            Category::Study => "📚",
            Category::Creative => "🎨",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "work" => Some(Category::Work),
            "personal" => Some(Category::Personal),
            "study" => Some(Category::Study),
            "creative" => Some(Category::Creative),
            _ => None,
        }
    }
}

/// The sidebar's category selector: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const TAGS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Work),
        CategoryFilter::Only(Category::Personal),
        CategoryFilter::Only(Category::Study),
        CategoryFilter::Only(Category::Creative),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c.as_str(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Chats",
            CategoryFilter::Only(c) => c.display_name(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CategoryFilter::All => "📑",
            CategoryFilter::Only(c) => c.icon(),
        }
    }

    pub fn accepts(&self, category: Option<Category>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => category == Some(*c),
        }
    }

    /// Category given to threads created while this filter is selected.
    pub fn new_thread_category(&self) -> Category {
        match self {
            CategoryFilter::All => Category::Personal,
            CategoryFilter::Only(c) => *c,
        }
    }
}
