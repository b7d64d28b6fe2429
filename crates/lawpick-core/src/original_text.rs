//! Reflow of raw statute text for the "original text" tab.
//!
//! Statute bodies arrive as one long run of text. Article and paragraph
//! markers get a blank line in front so the result splits into paragraphs
//! on `\n\n`.

use std::sync::LazyLock;

use regex::Regex;

static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])(제\d+조)").expect("article regex"));
static CIRCLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\n])([①②③④⑤⑥⑦⑧⑨⑩⑪⑫⑬⑭⑮⑯⑰⑱⑲⑳])").expect("circled regex")
});
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])(\d+\.\s)").expect("numbered regex"));
static HANGUL_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n([가나다라마바사아자차카타파하]\.\s)").expect("item regex"));
static PAREN_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])(\d+\)\s)").expect("paren item regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("spaces regex"));
static LINE_EDGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").expect("line edge regex"));
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank regex"));

/// Insert paragraph breaks before statute markers and tidy whitespace.
///
/// - blank line before `제N조`, `①`–`⑳`, `N. ` and `N) `
/// - extra newline before `가. `…`하. ` items that already start a line
/// - runs of spaces and tabs collapse to one space, and lines are trimmed
/// - at most one blank line in a row
pub fn format_original_content(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let out = ARTICLE.replace_all(text, "$1\n\n$2");
    let out = CIRCLED.replace_all(&out, "$1\n\n$2");
    let out = NUMBERED.replace_all(&out, "$1\n\n$2");
    let out = HANGUL_ITEM.replace_all(&out, "\n\n$1");
    let out = PAREN_ITEM.replace_all(&out, "$1\n\n$2");
    let out = SPACES.replace_all(&out, " ");
    let out = LINE_EDGE.replace_all(&out, "\n");
    let out = BLANK_RUN.replace_all(&out, "\n\n");
    out.trim().to_string()
}

/// Paragraphs of formatted text, blank ones dropped.
pub fn paragraphs(formatted: &str) -> impl Iterator<Item = &str> {
    formatted.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

/// Whether a paragraph opens with a paragraph or item number and should
/// render as a heading line.
pub fn is_item_paragraph(paragraph: &str) -> bool {
    let p = paragraph.trim_start();
    let Some(first) = p.chars().next() else {
        return false;
    };
    if ('①'..='⑳').contains(&first) {
        return true;
    }
    let digits = p.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && p[digits..].starts_with(". ")
}
