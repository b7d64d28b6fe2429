//! Client-side list projection: category union, search filter, sort, page.
//!
//! The law list is fetched in bulk and paged locally; the bill list is small
//! enough to do the same. [`project`] is a pure function of the fetched
//! records and the [`FilterState`], so the visible page can be recomputed on
//! every state change without touching the network.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Range;

use chrono::NaiveDate;
use regex::RegexBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::Category;
use crate::query::{FilterState, QueryToken, SearchMode};

/// A browsable list (laws or bills): its record type, URL enums, and the
/// record accessors the projection needs.
pub trait ListKind: Debug + Clone + PartialEq + Eq + Send + Sync + 'static {
    type Item: Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    type SearchType: SearchMode;
    type OrderBy: QueryToken;

    /// URL parameter naming the open detail record.
    const ID_PARAM: &'static str;
    /// Records per visible page.
    const PAGE_SIZE: usize;
    /// Records requested from the backend per fetch.
    const FETCH_SIZE: usize;

    fn item_id(item: &Self::Item) -> &str;

    fn item_category(item: &Self::Item) -> Option<Category>;

    /// Date a date-range search filters on.
    fn item_date(item: &Self::Item) -> Option<NaiveDate>;

    /// Client-side text match. `needle` is already lowercased and non-empty.
    fn matches_search(item: &Self::Item, search_type: Self::SearchType, needle: &str) -> bool;

    /// Sort comparison. `Equal` keeps backend order.
    fn compare(order: Self::OrderBy, a: &Self::Item, b: &Self::Item) -> Ordering;
}

/// One visible page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    /// Matching records across all pages.
    pub total_count: usize,
    pub total_pages: u32,
    /// The page actually shown, after clamping.
    pub page: u32,
    /// `true` when the requested page was past the end and page 1 is shown instead.
    pub clamped: bool,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            page: 1,
            clamped: false,
        }
    }
}

/// `ceil(count / page_size)`.
pub fn total_pages(count: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size) as u32
}

/// Keep `page` when it exists, otherwise fall back to page 1.
///
/// Returns the page to show and whether it was clamped.
pub fn clamp_page(page: u32, total_pages: u32) -> (u32, bool) {
    let page = page.max(1);
    if page > total_pages.max(1) {
        (1, true)
    } else {
        (page, false)
    }
}

/// Whether a record passes the category and search filters of `state`.
pub fn matches<K: ListKind>(item: &K::Item, state: &FilterState<K>) -> bool {
    if !state.categories.is_empty()
        && !K::item_category(item).is_some_and(|c| state.categories.contains(&c))
    {
        return false;
    }

    if state.search_type.is_date_range() {
        if state.dates.is_unbounded() {
            return true;
        }
        return K::item_date(item).is_some_and(|d| state.dates.contains(d));
    }

    let needle = state.search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    K::matches_search(item, state.search_type, &needle)
}

/// Filter and stably sort, without paging.
pub fn filter_and_sort<K: ListKind>(items: &[K::Item], state: &FilterState<K>) -> Vec<K::Item> {
    let mut filtered: Vec<K::Item> = items
        .iter()
        .filter(|item| matches::<K>(item, state))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| K::compare(state.order_by, a, b));
    filtered
}

/// The visible page for `state` over the fetched `items`.
pub fn project<K: ListKind>(items: &[K::Item], state: &FilterState<K>) -> ListView<K::Item> {
    let filtered = filter_and_sort::<K>(items, state);
    let total_count = filtered.len();
    let total_pages = total_pages(total_count, K::PAGE_SIZE);
    let (page, clamped) = clamp_page(state.page, total_pages);

    let start = (page as usize - 1) * K::PAGE_SIZE;
    let items = filtered
        .into_iter()
        .skip(start)
        .take(K::PAGE_SIZE)
        .collect();

    ListView {
        items,
        total_count,
        total_pages,
        page,
        clamped,
    }
}

/// Case-insensitive substring test on an optional field.
pub fn field_contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

/// Byte ranges of case-insensitive occurrences of `query` in `text`, for
/// emphasising search hits in result rows.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Compare optional dates, newest first, missing dates last.
pub fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
