//! Section parser for AI-generated law summaries.
//!
//! A summary document follows a loose convention:
//!
//! ```text
//! # 주택임대차보호법              ← header info
//! > 법령 ID: 001234
//!
//! ## 1. 무엇이 바뀌었나요?        ← easy explanation entries
//! **임차인**(집을 빌린 사람)은 ...
//!
//! ## 📚 주요 용어 설명            ← glossary
//! - **임차인**: 집을 빌려 쓰는 사람
//!
//! ## 🔄 개정 전후 비교            ← before/after comparison
//! ### 개정 전
//! ...
//! ### 개정 후
//! ...
//! ```
//!
//! [`parse`] makes one forward pass over the lines, threading an explicit
//! region tag through a fold. Each region accumulates into its own local
//! list; nothing survives between calls, so the output is a pure function of
//! the input text. Malformed documents degrade to empty sections.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Phrase that opens the glossary region.
pub const GLOSSARY_MARKER: &str = "주요 용어 설명";
pub const GLOSSARY_ICON: &str = "📚";
/// Phrase that opens the before/after comparison region.
pub const COMPARE_MARKER: &str = "개정 전후 비교";
pub const COMPARE_ICON: &str = "🔄";

static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+[0-9]+\.").expect("valid numbered heading regex"));
static BEFORE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+개정\s+전").expect("valid before heading regex"));
static AFTER_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+개정\s+후").expect("valid after heading regex"));
static GLOSSARY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+\*\*([^*]+)\*\*:\s*(.+)$").expect("valid glossary entry regex")
});
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s").expect("valid heading regex"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\((?:[^()\s]|\([^()\s]*\))+\)").expect("valid image regex")
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]+\]\((?:[^()\s]|\([^()\s]*\))+\)").expect("valid link regex")
});
static FULLWIDTH_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"（[^）]*）").expect("valid full-width paren regex"));
static ASCII_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid paren regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));

// Private-use code points bracket the placeholder index so that neither
// paren pattern can match inside it.
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

// ── Output types ──

/// A `{term, definition}` pair from the glossary region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub before: String,
    pub after: String,
}

/// The four semantic regions of a law summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMarkdown {
    /// Heading and citation block.
    pub law_info: String,
    /// Numbered-section prose with parenthetical asides removed.
    pub easy_explanation: String,
    pub compare: Option<Comparison>,
    /// Document order; duplicate terms are kept.
    pub term_dictionary: Vec<GlossaryTerm>,
}

/// A `**bold**` span of the explanation, matched against the glossary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoldSpan {
    /// Byte range of the whole `**...**` token in `easy_explanation`.
    pub range: std::ops::Range<usize>,
    pub text: String,
    /// Index into `term_dictionary` when the text names a glossary term.
    pub glossary_index: Option<usize>,
}

impl ParsedMarkdown {
    /// Look up a glossary entry by exact term text. The last entry wins when
    /// a term is listed more than once.
    pub fn lookup_term(&self, term: &str) -> Option<&GlossaryTerm> {
        self.term_index(term).map(|i| &self.term_dictionary[i])
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_dictionary.iter().rposition(|t| t.term == term)
    }

    /// Every bold span in the explanation, in order. Spans whose text does
    /// not name a glossary term render as plain bold.
    pub fn bold_spans(&self) -> Vec<BoldSpan> {
        BOLD.captures_iter(&self.easy_explanation)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let text = caps.get(1)?.as_str().to_string();
                Some(BoldSpan {
                    range: whole.range(),
                    glossary_index: self.term_index(&text),
                    text,
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.law_info.is_empty()
            && self.easy_explanation.is_empty()
            && self.compare.is_none()
            && self.term_dictionary.is_empty()
    }
}

// ── Parser state ──

/// Which part of the comparison region is collecting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Pending,
    Before,
    After,
}

/// The "current section" tag carried through the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Preamble,
    LawInfo,
    Explanation,
    Glossary,
    Compare(Side),
}

/// How a single line is treated, decided before looking at the region's content rules.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    GlossaryStart,
    CompareStart,
    BeforeStart,
    AfterStart,
    Title,
    Citation,
    NumberedHeading,
    Content,
}

fn classify(line: &str) -> LineKind {
    if line.contains(GLOSSARY_MARKER) || line.contains(GLOSSARY_ICON) {
        LineKind::GlossaryStart
    } else if line.contains(COMPARE_MARKER) || line.contains(COMPARE_ICON) {
        LineKind::CompareStart
    } else if BEFORE_HEADING.is_match(line) {
        LineKind::BeforeStart
    } else if AFTER_HEADING.is_match(line) {
        LineKind::AfterStart
    } else if line.starts_with("# ") {
        LineKind::Title
    } else if line.starts_with("> ") {
        LineKind::Citation
    } else if NUMBERED_HEADING.is_match(line) {
        LineKind::NumberedHeading
    } else {
        LineKind::Content
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    law_info: Vec<&'a str>,
    explanation: Vec<&'a str>,
    before: Vec<&'a str>,
    after: Vec<&'a str>,
    glossary: Vec<GlossaryTerm>,
}

fn step<'a>(region: Region, line: &'a str, acc: &mut Accumulator<'a>) -> Region {
    match classify(line) {
        LineKind::GlossaryStart => Region::Glossary,
        // A new comparison region starts over.
        LineKind::CompareStart => {
            acc.before.clear();
            acc.after.clear();
            Region::Compare(Side::Pending)
        }
        LineKind::BeforeStart => match region {
            Region::Compare(_) => Region::Compare(Side::Before),
            other => other,
        },
        LineKind::AfterStart => match region {
            Region::Compare(_) => Region::Compare(Side::After),
            other => other,
        },
        LineKind::Title => {
            acc.law_info.push(line);
            Region::LawInfo
        }
        LineKind::Citation => {
            // Citations only belong to the header; elsewhere they are dropped.
            if matches!(region, Region::Preamble | Region::LawInfo) {
                acc.law_info.push(line);
                Region::LawInfo
            } else {
                region
            }
        }
        LineKind::NumberedHeading => {
            acc.explanation.push(line);
            Region::Explanation
        }
        LineKind::Content => {
            match region {
                Region::Preamble => {}
                Region::LawInfo => {
                    if !line.starts_with("##") && !line.trim().is_empty() {
                        acc.law_info.push(line);
                    }
                }
                Region::Explanation => acc.explanation.push(line),
                Region::Glossary => {
                    if let Some(caps) = GLOSSARY_ENTRY.captures(line) {
                        acc.glossary.push(GlossaryTerm {
                            term: caps[1].trim().to_string(),
                            definition: caps[2].trim().to_string(),
                        });
                    }
                }
                Region::Compare(side) => {
                    if !line.trim().is_empty() && !line.starts_with("###") {
                        match side {
                            Side::Before => acc.before.push(line),
                            Side::After => acc.after.push(line),
                            Side::Pending => {}
                        }
                    }
                }
            }
            region
        }
    }
}

// ── Public API ──

/// Split a law summary into its semantic regions. Never fails.
pub fn parse(markdown: &str) -> ParsedMarkdown {
    let mut acc = Accumulator::default();
    markdown
        .lines()
        .fold(Region::Preamble, |region, line| step(region, line, &mut acc));

    let compare = if acc.before.is_empty() && acc.after.is_empty() {
        None
    } else {
        Some(Comparison {
            before: acc.before.join("\n").trim().to_string(),
            after: acc.after.join("\n").trim().to_string(),
        })
    };

    ParsedMarkdown {
        law_info: acc.law_info.join("\n").trim().to_string(),
        easy_explanation: strip_parenthetical_asides(acc.explanation.join("\n").trim()),
        compare,
        term_dictionary: acc.glossary,
    }
}

/// Remove `(…)` and `（…）` asides from each prose line.
///
/// Links and images are swapped out for placeholders first so that their
/// URLs survive, and runs of whitespace collapse to one space. Blank lines
/// and heading lines pass through untouched.
pub fn strip_parenthetical_asides(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() || HEADING_LINE.is_match(line) {
                return line.to_string();
            }

            let mut protected: Vec<String> = Vec::new();
            let mut shield = |re: &Regex, input: &str| -> String {
                re.replace_all(input, |caps: &regex::Captures<'_>| {
                    protected.push(caps[0].to_string());
                    format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", protected.len() - 1)
                })
                .into_owned()
            };
            let shielded = shield(&*IMAGE, line);
            let shielded = shield(&*LINK, &shielded);

            let stripped = FULLWIDTH_PARENS.replace_all(&shielded, "");
            let mut stripped = ASCII_PARENS.replace_all(&stripped, "").into_owned();

            // Outer spans hold inner placeholders, so restore them first.
            for (i, original) in protected.iter().enumerate().rev() {
                let placeholder = format!("{PLACEHOLDER_OPEN}{i}{PLACEHOLDER_CLOSE}");
                stripped = stripped.replacen(&placeholder, original, 1);
            }

            WHITESPACE.replace_all(&stripped, " ").trim().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# 주택임대차보호법
> 법령 ID: 001234
> 시행일: 2024-05-01

## 1. 무엇이 바뀌었나요?
**임차인**(집을 빌린 사람)은 계약을 갱신할 수 있어요.

## 2. 누구에게 해당되나요?
전세로 사는 **청년**에게 해당해요.

## 📚 주요 용어 설명
- **임차인**: 집을 빌려 쓰는 사람
- **임대인**: 집을 빌려 주는 사람
이 줄은 무시됩니다

## 🔄 개정 전후 비교
무시되는 도입 문장
### 개정 전
계약 갱신 1회
### 개정 후
계약 갱신 2회
";

    fn term(term: &str, definition: &str) -> GlossaryTerm {
        GlossaryTerm {
            term: term.into(),
            definition: definition.into(),
        }
    }

    #[test]
    fn splits_all_four_regions() {
        let parsed = parse(SAMPLE);
        assert_eq!(
            parsed.law_info,
            "# 주택임대차보호법\n> 법령 ID: 001234\n> 시행일: 2024-05-01"
        );
        assert_eq!(
            parsed.easy_explanation,
            "## 1. 무엇이 바뀌었나요?\n**임차인**은 계약을 갱신할 수 있어요.\n\n\
             ## 2. 누구에게 해당되나요?\n전세로 사는 **청년**에게 해당해요."
        );
        assert_eq!(
            parsed.term_dictionary,
            vec![
                term("임차인", "집을 빌려 쓰는 사람"),
                term("임대인", "집을 빌려 주는 사람"),
            ]
        );
        assert_eq!(
            parsed.compare,
            Some(Comparison {
                before: "계약 갱신 1회".into(),
                after: "계약 갱신 2회".into(),
            })
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(parse(SAMPLE), parse(SAMPLE));
    }

    #[test]
    fn no_glossary_marker_means_empty_dictionary() {
        let parsed = parse("# 제목\n## 1. 설명\n- **용어**: 정의처럼 보이는 줄");
        assert!(parsed.term_dictionary.is_empty());
        assert!(parsed.compare.is_none());
    }

    #[test]
    fn glossary_keeps_document_order_and_duplicates() {
        let md = "## 📚 주요 용어 설명\n- **Term A**: def A\n- **Term B**: def B\n- **Term A**: def A2";
        let parsed = parse(md);
        assert_eq!(
            parsed.term_dictionary,
            vec![
                term("Term A", "def A"),
                term("Term B", "def B"),
                term("Term A", "def A2"),
            ]
        );
        assert_eq!(parsed.lookup_term("Term A").unwrap().definition, "def A2");
    }

    #[test]
    fn glossary_icon_alone_opens_region() {
        let parsed = parse("### 📚\n- **Term A**: def A");
        assert_eq!(parsed.term_dictionary, vec![term("Term A", "def A")]);
    }

    #[test]
    fn marker_line_ends_explanation() {
        let md = "## 1. 설명\n본문\n주요 용어 설명\n- **A**: a";
        let parsed = parse(md);
        assert_eq!(parsed.easy_explanation, "## 1. 설명\n본문");
        assert_eq!(parsed.term_dictionary.len(), 1);
    }

    #[test]
    fn compare_lines_before_first_side_are_dropped() {
        let md = "## 🔄 개정 전후 비교\n소개\n### 개정 후\n새 규정";
        let parsed = parse(md);
        assert_eq!(
            parsed.compare,
            Some(Comparison {
                before: String::new(),
                after: "새 규정".into(),
            })
        );
    }

    #[test]
    fn empty_compare_region_is_none() {
        let parsed = parse("## 🔄 개정 전후 비교\n### 개정 전\n\n### 개정 후\n");
        assert!(parsed.compare.is_none());
    }

    #[test]
    fn citation_outside_header_is_dropped() {
        let parsed = parse("## 1. 설명\n> 인용문\n본문");
        assert_eq!(parsed.law_info, "");
        assert_eq!(parsed.easy_explanation, "## 1. 설명\n본문");
    }

    #[test]
    fn unnumbered_h2_inside_header_is_dropped() {
        let parsed = parse("# 제목\n## 개요\n추가 정보");
        assert_eq!(parsed.law_info, "# 제목\n추가 정보");
    }

    #[test]
    fn garbage_input_does_not_panic() {
        let parsed = parse("### 개정 전\n)))((( **\n- **:\n");
        assert!(parsed.is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn strips_ascii_and_fullwidth_asides() {
        assert_eq!(
            strip_parenthetical_asides("임대차(집을 빌리는 것)는..."),
            "임대차는..."
        );
        assert_eq!(
            strip_parenthetical_asides("보증금（전세금）을  돌려받아요"),
            "보증금을 돌려받아요"
        );
    }

    #[test]
    fn link_target_with_parens_is_preserved() {
        assert_eq!(
            strip_parenthetical_asides("[링크](http://x.com/a(b))"),
            "[링크](http://x.com/a(b))"
        );
        assert_eq!(
            strip_parenthetical_asides("자세히(참고) [법령](https://law.go.kr/a) 보기"),
            "자세히 [법령](https://law.go.kr/a) 보기"
        );
    }

    #[test]
    fn image_is_preserved() {
        assert_eq!(
            strip_parenthetical_asides("![표(1)](img/table(1).png) 설명(생략)"),
            "![표(1)](img/table(1).png) 설명"
        );
    }

    #[test]
    fn linked_image_is_preserved() {
        assert_eq!(
            strip_parenthetical_asides("[![배지](img/a.png)](https://x.com) 설명(생략)"),
            "[![배지](img/a.png)](https://x.com) 설명"
        );
    }

    #[test]
    fn headings_and_blank_lines_pass_through() {
        let text = "## 1. 제목(부제)\n\n본문(설명)   끝";
        assert_eq!(strip_parenthetical_asides(text), "## 1. 제목(부제)\n\n본문 끝");
    }

    #[test]
    fn bold_spans_match_glossary_by_exact_text() {
        let parsed = parse(SAMPLE);
        let spans = parsed.bold_spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "임차인");
        assert_eq!(spans[0].glossary_index, Some(0));
        assert_eq!(spans[1].text, "청년");
        assert_eq!(spans[1].glossary_index, None);
        assert_eq!(
            &parsed.easy_explanation[spans[0].range.clone()],
            "**임차인**"
        );
    }
}
