//! The two browsable lists: laws and youth-proposal bills.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::listing::{ListKind, field_contains, newest_first};
use crate::model::{BillListItem, Category, LawListItem};
use crate::query::{QueryToken, SearchMode, parse_date};

// ── Laws ──

/// Marker for the law list (`law_id` detail param, 20 per page).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Laws;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LawSearchType {
    #[default]
    All,
    Title,
    Ministry,
    Content,
    Date,
}

impl QueryToken for LawSearchType {
    const ALL: &'static [Self] = &[
        Self::All,
        Self::Title,
        Self::Ministry,
        Self::Content,
        Self::Date,
    ];

    fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Title => "title",
            Self::Ministry => "ministry",
            Self::Content => "content",
            Self::Date => "date",
        }
    }
}

impl SearchMode for LawSearchType {
    fn is_date_range(self) -> bool {
        self == Self::Date
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LawOrder {
    /// Responsible ministry, 가나다 order.
    #[default]
    Ministry,
    Title,
    /// Enforcement start date, newest first.
    StartDate,
}

impl QueryToken for LawOrder {
    const ALL: &'static [Self] = &[Self::Ministry, Self::Title, Self::StartDate];

    fn token(self) -> &'static str {
        match self {
            Self::Ministry => "ministry",
            Self::Title => "title",
            Self::StartDate => "start_date",
        }
    }
}

impl ListKind for Laws {
    type Item = LawListItem;
    type SearchType = LawSearchType;
    type OrderBy = LawOrder;

    const ID_PARAM: &'static str = "law_id";
    const PAGE_SIZE: usize = 20;
    const FETCH_SIZE: usize = 1000;

    fn item_id(item: &LawListItem) -> &str {
        &item.law_id
    }

    fn item_category(item: &LawListItem) -> Option<Category> {
        item.category()
    }

    fn item_date(item: &LawListItem) -> Option<NaiveDate> {
        parse_date(&item.start_date)
    }

    fn matches_search(item: &LawListItem, search_type: LawSearchType, needle: &str) -> bool {
        match search_type {
            // The backend already searched every field, including ones not in list rows.
            LawSearchType::All | LawSearchType::Date => true,
            LawSearchType::Title => field_contains(Some(&item.title), needle),
            LawSearchType::Ministry => field_contains(item.responsible_ministry.as_deref(), needle),
            LawSearchType::Content => {
                field_contains(Some(&item.short_desc), needle)
                    || field_contains(item.one_line_summary.as_deref(), needle)
            }
        }
    }

    fn compare(order: LawOrder, a: &LawListItem, b: &LawListItem) -> Ordering {
        match order {
            LawOrder::Ministry => a
                .responsible_ministry
                .as_deref()
                .unwrap_or_default()
                .cmp(b.responsible_ministry.as_deref().unwrap_or_default()),
            LawOrder::Title => a.title.cmp(&b.title),
            LawOrder::StartDate => newest_first(Self::item_date(a), Self::item_date(b)),
        }
    }
}

// ── Bills ──

/// Marker for the youth-proposal bill list (`bill_no` detail param, 10 per page).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bills;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BillSearchType {
    #[default]
    All,
    /// Bill name.
    Bill,
    /// Promulgated law name.
    Law,
    /// Responsible committee.
    Ministry,
    /// Promulgation number.
    PromNo,
}

impl QueryToken for BillSearchType {
    const ALL: &'static [Self] = &[
        Self::All,
        Self::Bill,
        Self::Law,
        Self::Ministry,
        Self::PromNo,
    ];

    fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Bill => "bill",
            Self::Law => "law",
            Self::Ministry => "ministry",
            Self::PromNo => "prom_no",
        }
    }
}

impl SearchMode for BillSearchType {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BillOrder {
    #[default]
    EnforcementDate,
    PromDt,
    /// Plenary resolution date, newest first.
    RgsRslnDt,
    BillNm,
}

impl QueryToken for BillOrder {
    const ALL: &'static [Self] = &[
        Self::EnforcementDate,
        Self::PromDt,
        Self::RgsRslnDt,
        Self::BillNm,
    ];

    fn token(self) -> &'static str {
        match self {
            Self::EnforcementDate => "enforcement_date",
            Self::PromDt => "prom_dt",
            Self::RgsRslnDt => "rgs_rsln_dt",
            Self::BillNm => "bill_nm",
        }
    }
}

impl BillOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::EnforcementDate => "시행일",
            Self::PromDt => "공포일",
            Self::RgsRslnDt => "본회의 의결일",
            Self::BillNm => "법안명",
        }
    }
}

impl ListKind for Bills {
    type Item = BillListItem;
    type SearchType = BillSearchType;
    type OrderBy = BillOrder;

    const ID_PARAM: &'static str = "bill_no";
    const PAGE_SIZE: usize = 10;
    const FETCH_SIZE: usize = 100;

    fn item_id(item: &BillListItem) -> &str {
        &item.bill_no
    }

    fn item_category(item: &BillListItem) -> Option<Category> {
        item.category()
    }

    fn item_date(item: &BillListItem) -> Option<NaiveDate> {
        item.rgs_rsln_dt.as_deref().and_then(parse_date)
    }

    fn matches_search(item: &BillListItem, search_type: BillSearchType, needle: &str) -> bool {
        match search_type {
            BillSearchType::Bill => field_contains(item.bill_nm.as_deref(), needle),
            BillSearchType::Ministry => field_contains(item.jrcmit_nm.as_deref(), needle),
            // Law names and promulgation numbers are not in list rows.
            BillSearchType::All | BillSearchType::Law | BillSearchType::PromNo => true,
        }
    }

    fn compare(order: BillOrder, a: &BillListItem, b: &BillListItem) -> Ordering {
        match order {
            BillOrder::RgsRslnDt => newest_first(Self::item_date(a), Self::item_date(b)),
            BillOrder::BillNm => a
                .bill_nm
                .as_deref()
                .unwrap_or_default()
                .cmp(b.bill_nm.as_deref().unwrap_or_default()),
            // Not carried by list rows; the backend's order stands.
            BillOrder::EnforcementDate | BillOrder::PromDt => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::project;
    use crate::query::FilterState;

    fn bill(no: &str, name: &str, committee: &str, date: Option<&str>, code: u8) -> BillListItem {
        BillListItem {
            bill_no: no.into(),
            bill_nm: Some(name.into()),
            bill_summary: None,
            rgs_rsln_dt: date.map(str::to_string),
            jrcmit_nm: Some(committee.into()),
            is_youth_proposal: code,
        }
    }

    #[test]
    fn search_type_tokens_roundtrip() {
        for t in LawSearchType::ALL {
            assert_eq!(LawSearchType::from_token(t.token()), Some(*t));
        }
        for t in BillSearchType::ALL {
            assert_eq!(BillSearchType::from_token(t.token()), Some(*t));
        }
        assert_eq!(BillOrder::from_token("prom_dt"), Some(BillOrder::PromDt));
        assert_eq!(LawOrder::from_token("bill_nm"), None);
    }

    #[test]
    fn only_law_date_search_is_a_range() {
        assert!(LawSearchType::Date.is_date_range());
        assert!(!LawSearchType::Title.is_date_range());
        assert!(!BillSearchType::PromNo.is_date_range());
    }

    #[test]
    fn bill_committee_search() {
        let items = vec![
            bill("1", "주거안정법", "국토교통위원회", None, 1),
            bill("2", "청년고용법", "환경노동위원회", None, 2),
        ];
        let state = FilterState::<Bills> {
            search: "국토".into(),
            search_type: BillSearchType::Ministry,
            ..Default::default()
        };
        let view = project::<Bills>(&items, &state);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].bill_no, "1");
    }

    #[test]
    fn bill_default_order_keeps_backend_order() {
        let items = vec![
            bill("3", "다", "x", Some("2024-01-01"), 1),
            bill("1", "가", "x", Some("2024-03-01"), 1),
            bill("2", "나", "x", None, 1),
        ];
        let view = project::<Bills>(&items, &FilterState::default());
        let order: Vec<_> = view.items.iter().map(|b| b.bill_no.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);

        let by_date = FilterState::<Bills> {
            order_by: BillOrder::RgsRslnDt,
            ..Default::default()
        };
        let view = project::<Bills>(&items, &by_date);
        let order: Vec<_> = view.items.iter().map(|b| b.bill_no.as_str()).collect();
        assert_eq!(order, vec!["1", "3", "2"]);
    }

    #[test]
    fn bill_category_filter_uses_numeric_code() {
        let items = vec![
            bill("1", "a", "x", None, 1),
            bill("2", "b", "x", None, 3),
        ];
        let state = FilterState::<Bills> {
            categories: [Category::Finance].into_iter().collect(),
            ..Default::default()
        };
        let view = project::<Bills>(&items, &state);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].bill_no, "2");
    }
}
