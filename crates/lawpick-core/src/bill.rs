//! Presentation helpers for the youth-proposal bill detail view.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{BillDetail, Category};
use crate::query::QueryParams;

const LAW_CENTRE_HOME: &str = "https://www.law.go.kr/";

static LAW_ID_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:law_id|lsiSeq)=([\w-]+)").expect("law id regex"));

/// A titled link in the "sources and original text" tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A [`BillDetail`] with the derived fields the detail view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BillPresentation {
    pub detail: BillDetail,
    pub category_name: &'static str,
    pub major_changes: Vec<String>,
    pub target_audience: Vec<String>,
    /// `제NNNNN호`.
    pub prom_no: Option<String>,
    pub sources: Vec<Source>,
    /// Law-summary id of the promulgated law, when its link carries one.
    pub law_id: Option<String>,
}

impl From<BillDetail> for BillPresentation {
    fn from(detail: BillDetail) -> Self {
        let category_name = Category::from_code(detail.is_youth_proposal)
            .map(Category::label)
            .unwrap_or("알 수 없음");
        Self {
            category_name,
            major_changes: split_semicolons(detail.major_changes.as_deref()),
            target_audience: split_semicolons(detail.target_audience.as_deref()),
            prom_no: detail.prom_no.as_deref().and_then(format_prom_no),
            sources: sources(&detail),
            law_id: detail.law_text_url.as_deref().and_then(extract_law_id),
            detail,
        }
    }
}

/// `"12345"` → `"제12345호"`, `"123"` → `"제00123호"`. A value already
/// starting with `제`, or with no digits at all, is returned as is.
pub fn format_prom_no(prom_no: &str) -> Option<String> {
    if prom_no.is_empty() {
        return None;
    }
    if prom_no.starts_with('제') {
        return Some(prom_no.to_string());
    }
    let digits: String = prom_no.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Some(prom_no.to_string());
    }
    Some(format!("제{digits:0>5}호"))
}

/// Split a `;`-separated report field into trimmed, non-empty items.
pub fn split_semicolons(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Source links in display order.
pub fn sources(detail: &BillDetail) -> Vec<Source> {
    let mut out = Vec::new();

    if let Some(law_name) = detail.prom_law_nm.as_deref().filter(|s| !s.is_empty()) {
        out.push(Source {
            title: format!("국가법령정보센터 - {law_name}"),
            url: detail
                .law_text_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| LAW_CENTRE_HOME.to_string()),
        });
    }

    if let (Some(name), Some(url)) = (non_empty(&detail.bill_nm), non_empty(&detail.link_url)) {
        out.push(Source {
            title: format!("국회 의안정보시스템 - {name}"),
            url: url.to_string(),
        });
    }

    if let Some(url) = non_empty(&detail.plenary_session_url) {
        out.push(Source {
            title: "국회 본회의 회의록".into(),
            url: url.to_string(),
        });
    }

    let committee = detail.committee_urls.as_deref().unwrap_or_default();
    for (i, url) in committee.iter().enumerate() {
        let title = if committee.len() > 1 {
            format!("소관위 회의록 ({})", i + 1)
        } else {
            "소관위 회의록".to_string()
        };
        out.push(Source {
            title,
            url: url.clone(),
        });
    }

    if let Some(url) = non_empty(&detail.legal_committee_url) {
        out.push(Source {
            title: "법사위 회의록".into(),
            url: url.to_string(),
        });
    }

    out
}

/// Read `law_id` (or the national law centre's `lsiSeq`) from a link.
pub fn extract_law_id(url: &str) -> Option<String> {
    if let Some((_, query)) = url.split_once('?') {
        let query = query.split('#').next().unwrap_or_default();
        let params = QueryParams::parse(query);
        if let Some(id) = params.get("law_id").or_else(|| params.get("lsiSeq")) {
            return Some(id.to_string());
        }
    }
    LAW_ID_IN_TEXT
        .captures(url)
        .map(|caps| caps[1].to_string())
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("12345", Some("제12345호"))]
    #[case("123", Some("제00123호"))]
    #[case("법률 19000호", Some("제19000호"))]
    #[case("제20001호", Some("제20001호"))]
    #[case("미정", Some("미정"))]
    #[case("", None)]
    fn prom_no_formatting(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(format_prom_no(raw).as_deref(), expected);
    }

    #[test]
    fn semicolon_lists() {
        assert_eq!(
            split_semicolons(Some(" 전세 보증 확대; ;청년 우대 ;")),
            vec!["전세 보증 확대".to_string(), "청년 우대".to_string()]
        );
        assert!(split_semicolons(None).is_empty());
    }

    #[test]
    fn sources_in_display_order() {
        let detail = BillDetail {
            bill_no: "2201234".into(),
            bill_nm: Some("주택임대차보호법 일부개정법률안".into()),
            link_url: Some("https://likms.assembly.go.kr/bill/2201234".into()),
            prom_law_nm: Some("주택임대차보호법".into()),
            plenary_session_url: Some("https://record/plenary".into()),
            committee_urls: Some(vec!["https://record/c1".into(), "https://record/c2".into()]),
            legal_committee_url: Some("https://record/legal".into()),
            ..Default::default()
        };
        let titles: Vec<_> = sources(&detail).into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "국가법령정보센터 - 주택임대차보호법",
                "국회 의안정보시스템 - 주택임대차보호법 일부개정법률안",
                "국회 본회의 회의록",
                "소관위 회의록 (1)",
                "소관위 회의록 (2)",
                "법사위 회의록",
            ]
        );
        assert_eq!(sources(&detail)[0].url, LAW_CENTRE_HOME);
    }

    #[test]
    fn single_committee_link_is_unnumbered() {
        let detail = BillDetail {
            committee_urls: Some(vec!["https://record/c1".into()]),
            ..Default::default()
        };
        let sources = sources(&detail);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "소관위 회의록");
    }

    #[rstest]
    #[case("https://www.law.go.kr/lsInfoP.do?lsiSeq=253527&efYd=20240101", Some("253527"))]
    #[case("http://localhost:3000/laws?law_id=001234#top", Some("001234"))]
    #[case("law_id=abc-9", Some("abc-9"))]
    #[case("https://www.law.go.kr/", None)]
    fn law_id_from_links(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_law_id(url).as_deref(), expected);
    }

    #[test]
    fn presentation_derives_fields() {
        let detail = BillDetail {
            bill_no: "2201234".into(),
            is_youth_proposal: 2,
            prom_no: Some("20345".into()),
            major_changes: Some("a;b".into()),
            law_text_url: Some("https://www.law.go.kr/lsInfoP.do?lsiSeq=1".into()),
            ..Default::default()
        };
        let view = BillPresentation::from(detail);
        assert_eq!(view.category_name, "취업");
        assert_eq!(view.prom_no.as_deref(), Some("제20345호"));
        assert_eq!(view.major_changes, vec!["a", "b"]);
        assert!(view.target_audience.is_empty());
        assert_eq!(view.law_id.as_deref(), Some("1"));

        let unknown = BillPresentation::from(BillDetail::default());
        assert_eq!(unknown.category_name, "알 수 없음");
    }
}
