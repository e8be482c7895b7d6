//! Checklist search.
//!
//! An item matches when the query is a case-insensitive substring of its
//! visible text or of its keyword attribute. Line breaks contribute nothing
//! to the visible text, so a query may span two lines.

use crate::view::ItemView;

pub trait ItemSearcher {
    fn matches(&self, item: &ItemView) -> bool;
}

/// Matches against the rendered item text.
pub struct TextSearcher {
    query: String,
}

impl TextSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl ItemSearcher for TextSearcher {
    fn matches(&self, item: &ItemView) -> bool {
        self.query.is_empty() || item.search_text().to_lowercase().contains(&self.query)
    }
}

/// Matches against the keyword attribute.
pub struct KeywordSearcher {
    query: String,
}

impl KeywordSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl ItemSearcher for KeywordSearcher {
    fn matches(&self, item: &ItemView) -> bool {
        self.query.is_empty() || item.keywords.to_lowercase().contains(&self.query)
    }
}

pub enum SearchBy {
    Text(TextSearcher),
    Keywords(KeywordSearcher),
}

impl SearchBy {
    fn matches(&self, item: &ItemView) -> bool {
        match self {
            Self::Text(s) => s.matches(item),
            Self::Keywords(s) => s.matches(item),
        }
    }
}

/// Matches if any sub-searcher matches; an empty composite matches everything.
#[derive(Default)]
pub struct CompositeSearcher {
    searchers: Vec<SearchBy>,
}

impl CompositeSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text and keyword search for the same query.
    pub fn all(query: impl Into<String>) -> Self {
        let query = query.into();
        Self::new()
            .with_search(SearchBy::Text(TextSearcher::new(query.clone())))
            .with_search(SearchBy::Keywords(KeywordSearcher::new(query)))
    }

    pub fn with_search(mut self, searcher: SearchBy) -> Self {
        self.searchers.push(searcher);
        self
    }
}

impl ItemSearcher for CompositeSearcher {
    fn matches(&self, item: &ItemView) -> bool {
        self.searchers.is_empty() || self.searchers.iter().any(|s| s.matches(item))
    }
}
