//! Backend capabilities the browse controllers depend on.
//!
//! [`ApiClient`](crate::ApiClient) implements these over HTTP; tests
//! implement them in memory.

use async_trait::async_trait;
use lawpick_core::listing::ListKind;
use lawpick_core::model::{BillDetail, Category, LawCards, LawDetail};
use lawpick_core::query::{DateRange, FilterState, QueryToken, SearchMode};

use crate::ApiError;

/// One list request. The backend filters by at most one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<K: ListKind> {
    pub category: Option<Category>,
    pub search: Option<String>,
    /// `None` for the default search type.
    pub search_type: Option<K::SearchType>,
    pub dates: DateRange,
    /// `None` for the default sort.
    pub order_by: Option<K::OrderBy>,
    pub size: usize,
}

impl<K: ListKind> Default for ListQuery<K> {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            search_type: None,
            dates: DateRange::default(),
            order_by: None,
            size: K::FETCH_SIZE,
        }
    }
}

impl<K: ListKind> ListQuery<K> {
    /// The request for one category slice of `state`.
    pub fn for_state(state: &FilterState<K>, category: Option<Category>) -> Self {
        let search_type = Some(state.search_type).filter(|t| !t.is_default());
        let (search, dates) = if state.search_type.is_date_range() {
            (None, state.dates)
        } else {
            let text = state.search.trim();
            let search = (!text.is_empty()).then(|| text.to_string());
            (search, DateRange::default())
        };
        Self {
            category,
            search,
            search_type,
            dates,
            order_by: Some(state.order_by).filter(|o| !o.is_default()),
            size: K::FETCH_SIZE,
        }
    }

    /// No category, no search, default sort.
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_none()
            && self.search.is_none()
            && self.search_type.is_none()
            && self.dates.is_unbounded()
    }
}

#[async_trait]
pub trait ListBackend<K: ListKind>: Send + Sync {
    async fn fetch_list(&self, query: &ListQuery<K>) -> Result<Vec<K::Item>, ApiError>;
}

#[async_trait]
pub trait LawBackend: Send + Sync {
    async fn law_detail(&self, law_id: &str) -> Result<LawDetail, ApiError>;

    async fn law_cards(&self, law_id: &str) -> Result<LawCards, ApiError>;
}

#[async_trait]
pub trait BillBackend: Send + Sync {
    async fn bill_detail(&self, bill_no: &str) -> Result<BillDetail, ApiError>;
}
