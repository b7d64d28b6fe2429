//! Record types returned by the Lawpick backend.
//!
//! Records are immutable once fetched and replaced wholesale on re-fetch.
//! Field names follow the backend's JSON exactly.

use serde::{Deserialize, Serialize};

// ── Category ──

/// Topic a law or bill is filed under.
///
/// The URL carries the snake_case token; bill records and the bill endpoint
/// carry a numeric code instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RealEstate,
    Finance,
    Employment,
    Education,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::RealEstate,
        Category::Finance,
        Category::Employment,
        Category::Education,
    ];

    /// URL / law-record token, e.g. `real_estate`.
    pub fn token(self) -> &'static str {
        match self {
            Category::RealEstate => "real_estate",
            Category::Finance => "finance",
            Category::Employment => "employment",
            Category::Education => "education",
        }
    }

    /// Parse a URL token. Numeric bill codes are accepted for old links.
    pub fn from_token(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        Self::ALL.into_iter().find(|c| c.token() == s)
    }

    /// Numeric code used by the bill endpoint: 1=real_estate, 2=employment,
    /// 3=finance, 4=education.
    pub fn code(self) -> u8 {
        match self {
            Category::RealEstate => 1,
            Category::Employment => 2,
            Category::Finance => 3,
            Category::Education => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Category::RealEstate),
            2 => Some(Category::Employment),
            3 => Some(Category::Finance),
            4 => Some(Category::Education),
            _ => None,
        }
    }

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::RealEstate => "부동산",
            Category::Finance => "금융",
            Category::Employment => "취업",
            Category::Education => "교육",
        }
    }
}

/// Display label for a raw category token. Missing → `기타`, unknown → the token itself.
pub fn category_label(token: Option<&str>) -> String {
    match token.filter(|t| !t.is_empty()) {
        None => "기타".to_string(),
        Some(t) => Category::from_token(t)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| t.to_string()),
    }
}

// ── Laws ──

/// One row of the law list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawListItem {
    pub law_id: String,
    #[serde(default)]
    pub title: String,
    /// `YYYY-MM-DD` enforcement start date.
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub card_cover_url: Option<String>,
    #[serde(default)]
    pub responsible_ministry: Option<String>,
    #[serde(default)]
    pub one_line_summary: Option<String>,
}

impl LawListItem {
    pub fn category(&self) -> Option<Category> {
        Category::from_token(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawListPage {
    pub items: Vec<LawListItem>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleTerm {
    pub term: String,
    pub easy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub card_id: u32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub simple_terms: Vec<SimpleTerm>,
}

/// Full law record from the detail endpoint. `markdown` feeds the section parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawDetail {
    pub law_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub responsible_ministry: Option<String>,
    #[serde(default)]
    pub one_line_summary: Option<String>,
    #[serde(default)]
    pub summary: Vec<SummaryCard>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub original_content: Option<String>,
    #[serde(default)]
    pub original_link: Option<String>,
    #[serde(default)]
    pub card_cover_url: Option<String>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Card-news image slides for a law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawCards {
    pub law_id: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub total_cards: usize,
}

// ── Bills ──

/// One row of the youth-proposal bill list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillListItem {
    pub bill_no: String,
    #[serde(default)]
    pub bill_nm: Option<String>,
    #[serde(default)]
    pub bill_summary: Option<String>,
    /// Plenary resolution date, `YYYY-MM-DD`.
    #[serde(default)]
    pub rgs_rsln_dt: Option<String>,
    /// Responsible committee.
    #[serde(default)]
    pub jrcmit_nm: Option<String>,
    /// Category code, see [`Category::code`].
    pub is_youth_proposal: u8,
}

impl BillListItem {
    pub fn category(&self) -> Option<Category> {
        Category::from_code(self.is_youth_proposal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub category: Option<u8>,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub count: usize,
    pub proposals: Vec<BillListItem>,
}

/// Youth-proposal detail: bill identity, promulgation data, the analysis
/// report, and meeting-minute links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillDetail {
    pub bill_no: String,
    pub is_youth_proposal: u8,

    pub bill_nm: Option<String>,
    pub rgs_rsln_dt: Option<String>,
    pub jrcmit_nm: Option<String>,
    pub gvrn_trsf_dt: Option<String>,
    pub prom_law_nm: Option<String>,
    pub prom_dt: Option<String>,
    pub prom_no: Option<String>,
    pub link_url: Option<String>,

    pub bill_summary: Option<String>,
    /// Semicolon-separated.
    pub major_changes: Option<String>,
    /// Semicolon-separated.
    pub target_audience: Option<String>,
    pub proposal_reason: Option<String>,
    pub core_content_changes: Option<String>,
    pub committee_arguments: Option<String>,
    pub expected_effects: Option<String>,
    pub risks: Option<String>,
    pub enforcement_date: Option<String>,
    pub enforcement_status: Option<String>,
    pub enforcement_details: Option<String>,
    pub law_text: Option<String>,
    pub law_text_url: Option<String>,

    pub plenary_session_url: Option<String>,
    pub committee_urls: Option<Vec<String>>,
    pub legal_committee_url: Option<String>,
}
