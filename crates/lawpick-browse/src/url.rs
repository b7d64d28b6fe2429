/// How a new query string enters browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    /// Rewrite the current entry (filter edits, paging).
    Replace,
    /// Add an entry so "back" returns to the previous view.
    Push,
}

/// A query string (without `?`) the presentation layer should write to the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlUpdate {
    pub query: String,
    pub history: History,
}

impl UrlUpdate {
    pub fn replace(query: String) -> Self {
        Self {
            query,
            history: History::Replace,
        }
    }

    pub fn push(query: String) -> Self {
        Self {
            query,
            history: History::Push,
        }
    }
}
