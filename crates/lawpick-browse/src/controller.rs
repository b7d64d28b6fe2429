//! URL-driven list controller: filter state, fetch sequencing, union fetch,
//! cache fallback, and the visible page.
//!
//! The controller never performs I/O on its own. A load is split into
//! [`ListController::begin_load`], which hands out a numbered
//! [`LoadTicket`], [`fetch_union`], which talks to the backend, and
//! [`ListController::finish_load`], which applies the result only if the
//! ticket is still the latest one issued. [`ListController::reload`] runs
//! all three in sequence.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use lawpick_api::{ApiError, ListBackend, ListQuery};
use lawpick_core::listing::{ListKind, ListView, project};
use lawpick_core::model::Category;
use lawpick_core::query::{DateRange, FilterState};
use lawpick_store::ListCache;
use tracing::{debug, info, warn};

use crate::error::ViewError;
use crate::url::UrlUpdate;

// ── Tickets ──

/// A numbered list request. One backend query per selected category, or a
/// single unfiltered-by-category query when none is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket<K: ListKind> {
    pub seq: u64,
    pub queries: Vec<ListQuery<K>>,
}

/// What [`ListController::finish_load`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Applied. Carries a URL rewrite when the page had to be clamped.
    Applied(Option<UrlUpdate>),
    /// A newer load was issued after this one; the result was dropped.
    Stale,
}

/// Run every query of a ticket and merge the results: query order first,
/// then backend order, each id kept once.
pub async fn fetch_union<K, B>(backend: &B, ticket: &LoadTicket<K>) -> Result<Vec<K::Item>, ApiError>
where
    K: ListKind,
    B: ListBackend<K> + ?Sized,
{
    let batches = try_join_all(ticket.queries.iter().map(|q| backend.fetch_list(q))).await?;
    Ok(merge_union::<K>(batches))
}

/// Concatenate result batches, dropping repeated ids.
pub fn merge_union<K: ListKind>(batches: Vec<Vec<K::Item>>) -> Vec<K::Item> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for item in batches.into_iter().flatten() {
        if seen.insert(K::item_id(&item).to_string()) {
            merged.push(item);
        }
    }
    merged
}

/// Parts of the filter state that change what the backend returns.
fn fetch_key<K: ListKind>(state: &FilterState<K>) -> FilterState<K> {
    FilterState {
        page: 1,
        selected: None,
        ..state.clone()
    }
}

// ── Search draft ──

/// Search inputs as typed, before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDraft<K: ListKind> {
    pub text: String,
    pub search_type: K::SearchType,
    pub dates: DateRange,
}

impl<K: ListKind> Default for SearchDraft<K> {
    fn default() -> Self {
        Self {
            text: String::new(),
            search_type: K::SearchType::default(),
            dates: DateRange::default(),
        }
    }
}

impl<K: ListKind> SearchDraft<K> {
    fn from_state(state: &FilterState<K>) -> Self {
        Self {
            text: state.search.clone(),
            search_type: state.search_type,
            dates: state.dates,
        }
    }
}

// ── Controller ──

/// One browsable list bound to the URL.
pub struct ListController<K: ListKind> {
    state: FilterState<K>,
    draft: SearchDraft<K>,
    items: Vec<K::Item>,
    view: ListView<K::Item>,
    error: Option<ViewError>,
    loading: bool,
    last_seq: u64,
    requested: Option<FilterState<K>>,
    loaded: Option<FilterState<K>>,
    cache: Option<ListCache<K::Item>>,
}

impl<K: ListKind> Default for ListController<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ListKind> ListController<K> {
    pub fn new() -> Self {
        Self {
            state: FilterState::default(),
            draft: SearchDraft::default(),
            items: Vec::new(),
            view: ListView::default(),
            error: None,
            loading: false,
            last_seq: 0,
            requested: None,
            loaded: None,
            cache: None,
        }
    }

    /// Persist unfiltered fetches to `cache` and fall back to it on network failure.
    pub fn with_cache(mut self, cache: ListCache<K::Item>) -> Self {
        self.cache = Some(cache);
        self
    }

    // ── Accessors ──

    pub fn state(&self) -> &FilterState<K> {
        &self.state
    }

    pub fn draft(&self) -> &SearchDraft<K> {
        &self.draft
    }

    pub fn view(&self) -> &ListView<K::Item> {
        &self.view
    }

    /// All fetched records behind the current view.
    pub fn items(&self) -> &[K::Item] {
        &self.items
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The canonical query string for the current state.
    pub fn url(&self) -> String {
        self.state.encode()
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    /// Whether the records on hand (or in flight) were fetched for a
    /// different filter than the current one.
    pub fn needs_load(&self) -> bool {
        self.requested.as_ref() != Some(&fetch_key(&self.state))
    }

    // ── URL ──

    /// Adopt the state encoded in `query` (initial load, back/forward).
    ///
    /// Returns a `Replace` update when the query was not in canonical form
    /// or its page no longer exists.
    pub fn navigate(&mut self, query: &str) -> Option<UrlUpdate> {
        self.state = FilterState::decode(query);
        self.draft = SearchDraft::from_state(&self.state);
        self.refresh_view();

        let canonical = self.state.encode();
        let incoming = query.trim().trim_start_matches('?');
        (canonical != incoming).then(|| UrlUpdate::replace(canonical))
    }

    // ── Category ──

    /// Add or remove one category. Resets the page and closes any detail.
    pub fn toggle_category(&mut self, category: Category) -> UrlUpdate {
        if !self.state.categories.remove(&category) {
            self.state.categories.insert(category);
        }
        self.after_category_change()
    }

    /// Replace the whole selection; an empty set means every category.
    pub fn set_categories(&mut self, categories: BTreeSet<Category>) -> UrlUpdate {
        self.state.categories = categories;
        self.after_category_change()
    }

    fn after_category_change(&mut self) -> UrlUpdate {
        self.state.page = 1;
        self.state.selected = None;
        self.refresh_view();
        UrlUpdate::replace(self.url())
    }

    // ── Search ──

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn set_search_type(&mut self, search_type: K::SearchType) {
        self.draft.search_type = search_type;
    }

    pub fn set_date_range(&mut self, dates: DateRange) {
        self.draft.dates = dates;
    }

    /// Apply the draft. Ignored while a load is in flight.
    pub fn submit_search(&mut self) -> Option<UrlUpdate> {
        if self.loading {
            debug!("search submitted while loading; ignored");
            return None;
        }
        self.state.search = self.draft.text.clone();
        self.state.search_type = self.draft.search_type;
        self.state.dates = self.draft.dates;
        self.state.page = 1;
        self.state = std::mem::take(&mut self.state).normalized();
        self.draft = SearchDraft::from_state(&self.state);
        self.refresh_view();
        Some(UrlUpdate::replace(self.url()))
    }

    /// Drop the search entirely: no text, no dates, default search type.
    pub fn clear_search(&mut self) -> UrlUpdate {
        self.state.search.clear();
        self.state.search_type = K::SearchType::default();
        self.state.dates = DateRange::default();
        self.state.page = 1;
        self.draft = SearchDraft::default();
        self.refresh_view();
        UrlUpdate::replace(self.url())
    }

    // ── Sort and page ──

    pub fn set_order(&mut self, order_by: K::OrderBy) -> UrlUpdate {
        self.state.order_by = order_by;
        self.state.page = 1;
        self.refresh_view();
        UrlUpdate::replace(self.url())
    }

    /// Show `page`; a page past the end shows page 1.
    pub fn go_to_page(&mut self, page: u32) -> UrlUpdate {
        self.state.page = page.max(1);
        self.refresh_view();
        UrlUpdate::replace(self.url())
    }

    // ── Detail ──

    /// Open a record, keeping every filter so "back" returns to this page.
    pub fn open_detail(&mut self, id: impl Into<String>) -> UrlUpdate {
        let id = id.into();
        self.state.selected = Some(id).filter(|s| !s.is_empty());
        UrlUpdate::push(self.url())
    }

    pub fn close_detail(&mut self) -> UrlUpdate {
        self.state.selected = None;
        UrlUpdate::push(self.url())
    }

    // ── Loading ──

    /// Issue the next request for the current filter.
    pub fn begin_load(&mut self) -> LoadTicket<K> {
        self.last_seq += 1;
        let key = fetch_key(&self.state);
        let queries = if key.categories.is_empty() {
            vec![ListQuery::for_state(&key, None)]
        } else {
            key.categories
                .iter()
                .map(|c| ListQuery::for_state(&key, Some(*c)))
                .collect()
        };
        debug!(seq = self.last_seq, queries = queries.len(), "list load issued");
        self.requested = Some(key);
        self.loading = true;
        LoadTicket {
            seq: self.last_seq,
            queries,
        }
    }

    /// Apply the result of `ticket`, unless a newer load has been issued since.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket<K>,
        result: Result<Vec<K::Item>, ApiError>,
        now: DateTime<Utc>,
    ) -> LoadOutcome {
        if ticket.seq != self.last_seq {
            info!(
                seq = ticket.seq,
                latest = self.last_seq,
                "discarding stale list response"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;
        self.loaded = self.requested.clone();

        match result {
            Ok(items) => {
                info!(count = items.len(), "list loaded");
                if let Some(cache) = &self.cache
                    && ticket.queries.len() == 1
                    && ticket.queries[0].is_unfiltered()
                    && let Err(e) = cache.persist(&items, now)
                {
                    warn!(error = %e, "failed to cache list");
                }
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                let fallback = match (&e, &self.cache) {
                    (ApiError::Network(_), Some(cache)) => cache.load_fresh(now),
                    _ => None,
                };
                match fallback {
                    Some(record) => {
                        warn!(
                            error = %e,
                            updated_at = %record.updated_at,
                            count = record.items.len(),
                            "list fetch failed; showing cached list"
                        );
                        self.items = record.items;
                        self.error = Some(ViewError::cache(record.updated_at));
                    }
                    None => {
                        warn!(error = %e, "list fetch failed");
                        self.items.clear();
                        self.error = Some(ViewError::from(&e));
                    }
                }
            }
        }

        let page_before = self.state.page;
        self.refresh_view();
        let clamped = (self.state.page != page_before).then(|| UrlUpdate::replace(self.url()));
        LoadOutcome::Applied(clamped)
    }

    /// Fetch and apply the current filter.
    pub async fn reload<B>(&mut self, backend: &B, now: DateTime<Utc>) -> LoadOutcome
    where
        B: ListBackend<K> + ?Sized,
    {
        let ticket = self.begin_load();
        let result = fetch_union(backend, &ticket).await;
        self.finish_load(&ticket, result, now)
    }

    /// Recompute the visible page when the records on hand match the filter.
    fn refresh_view(&mut self) {
        if self.loaded.as_ref() != Some(&fetch_key(&self.state)) {
            return;
        }
        self.view = project(&self.items, &self.state);
        if self.view.clamped {
            info!(
                requested = self.state.page,
                total_pages = self.view.total_pages,
                "page out of range; showing page 1"
            );
            self.state.page = self.view.page;
        }
    }
}
