//! Filter state and its URL query-string codec.
//!
//! The URL is the source of truth for what a list shows. [`FilterState::decode`]
//! reads a query string into a state; [`FilterState::encode`] writes one back.
//! Absent parameters always mean "default", never "keep the previous value".
//!
//! Parameters, in canonical order:
//!
//! | key           | meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `category`    | comma-joined category tokens                     |
//! | `search`      | free-text query (not written for date searches)  |
//! | `search_type` | omitted when `all`                               |
//! | `date_start`  | `YYYY-MM-DD`, date searches only                 |
//! | `date_end`    | `YYYY-MM-DD`, date searches only                 |
//! | `order_by`    | omitted when the default sort                    |
//! | `page`        | omitted when 1                                   |
//! | id param      | `law_id` / `bill_no` of the open detail view     |

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use chrono::NaiveDate;

use crate::listing::ListKind;
use crate::model::Category;

// ── Enum tokens ──

/// An enum carried in the URL as a fixed token.
pub trait QueryToken: Copy + Debug + Default + PartialEq + Eq + Hash + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn token(self) -> &'static str;

    fn from_token(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.token() == s)
    }

    fn is_default(self) -> bool {
        self == Self::default()
    }
}

/// A search-type enum. Date searches use the date range instead of free text.
pub trait SearchMode: QueryToken {
    fn is_date_range(self) -> bool {
        false
    }
}

// ── Dates ──

/// Parse a record or URL date. Accepts `YYYY-MM-DD`, `YYYYMMDD`, `YYYY.MM.DD`,
/// and ISO timestamps (the date part is used).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%Y.%m.%d"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .ok()
}

/// Inclusive date range; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

// ── Filter state ──

/// Everything that determines which slice of a list is on screen, plus the
/// id of the open detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<K: ListKind> {
    pub categories: BTreeSet<Category>,
    pub search: String,
    pub search_type: K::SearchType,
    pub dates: DateRange,
    pub order_by: K::OrderBy,
    /// 1-based.
    pub page: u32,
    pub selected: Option<String>,
}

impl<K: ListKind> Default for FilterState<K> {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            search: String::new(),
            search_type: K::SearchType::default(),
            dates: DateRange::default(),
            order_by: K::OrderBy::default(),
            page: 1,
            selected: None,
        }
    }
}

impl<K: ListKind> FilterState<K> {
    /// Whether a free-text search is in effect.
    pub fn has_text_search(&self) -> bool {
        !self.search_type.is_date_range() && !self.search.trim().is_empty()
    }

    /// Whether a date-range search is in effect.
    pub fn has_date_search(&self) -> bool {
        self.search_type.is_date_range() && !self.dates.is_unbounded()
    }

    /// Text search and date range are mutually exclusive; the search type picks one.
    pub fn normalized(mut self) -> Self {
        self.search = self.search.trim().to_string();
        if self.search_type.is_date_range() {
            self.search.clear();
        } else {
            self.dates = DateRange::default();
        }
        self.page = self.page.max(1);
        self.selected = self.selected.filter(|s| !s.is_empty());
        self
    }

    /// Ordered `(key, value)` pairs for this state, defaults omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.categories.is_empty() {
            let joined = self
                .categories
                .iter()
                .map(|c| c.token())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("category", joined));
        }
        if self.search_type.is_date_range() {
            pairs.push(("search_type", self.search_type.token().to_string()));
            if let Some(start) = self.dates.start {
                pairs.push(("date_start", start.format("%Y-%m-%d").to_string()));
            }
            if let Some(end) = self.dates.end {
                pairs.push(("date_end", end.format("%Y-%m-%d").to_string()));
            }
        } else {
            let search = self.search.trim();
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
            if !self.search_type.is_default() {
                pairs.push(("search_type", self.search_type.token().to_string()));
            }
        }
        if !self.order_by.is_default() {
            pairs.push(("order_by", self.order_by.token().to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if let Some(id) = self.selected.as_deref().filter(|s| !s.is_empty()) {
            pairs.push((K::ID_PARAM, id.to_string()));
        }
        pairs
    }

    /// Render as a query string without the leading `?`.
    pub fn encode(&self) -> String {
        self.to_pairs()
            .into_iter()
            .map(|(key, value)| {
                let value = value
                    .split(',')
                    .map(|part| urlencoding::encode(part).into_owned())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{key}={value}")
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Read a query string (with or without the leading `?`). Never fails:
    /// unknown tokens and malformed values fall back to defaults.
    pub fn decode(query: &str) -> Self {
        let params = QueryParams::parse(query);

        let categories = params
            .get("category")
            .map(|raw| raw.split(',').filter_map(Category::from_token).collect())
            .unwrap_or_default();

        let search_type = params
            .get("search_type")
            .and_then(<K::SearchType as QueryToken>::from_token)
            .unwrap_or_default();

        let order_by = params
            .get("order_by")
            .and_then(<K::OrderBy as QueryToken>::from_token)
            .unwrap_or_default();

        let page = params
            .get("page")
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let dates = DateRange::new(
            params.get("date_start").and_then(parse_date),
            params.get("date_end").and_then(parse_date),
        );

        Self {
            categories,
            search: params.get("search").unwrap_or_default().to_string(),
            search_type,
            dates,
            order_by,
            page,
            selected: params.get(K::ID_PARAM).map(str::to_string),
        }
        .normalized()
    }
}

// ── Raw query parsing ──

/// Decoded query-string pairs, in order. Lookups return the first value for a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// First non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
