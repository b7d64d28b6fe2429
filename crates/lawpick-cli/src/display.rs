//! Terminal rendering for list pages, law summaries, and bill details.
//!
//! Detail views print as vertical cards: a `=== title ===` banner, then
//! labelled rows grouped under section headers. Empty sections are skipped.

use std::ops::Range;

use lawpick_browse::{CardNews, LawView, ViewError};
use lawpick_core::bill::BillPresentation;
use lawpick_core::kinds::{Bills, Laws};
use lawpick_core::listing::{ListKind, ListView, highlight_ranges};
use lawpick_core::markdown::ParsedMarkdown;
use lawpick_core::model::{BillListItem, Category, LawListItem, category_label};
use lawpick_core::original_text::{is_item_paragraph, paragraphs};
use lawpick_core::query::{FilterState, QueryToken};

const MAX_LIST_ITEMS: usize = 10;

// ── Lists ──

pub fn print_law_list(view: &ListView<LawListItem>, state: &FilterState<Laws>) {
    print_page_header(view, "laws");
    for law in &view.items {
        let title = emphasise(&law.title, &highlight_ranges(&law.title, &state.search));
        println!(
            "  {:<10} [{}] {}",
            law.law_id,
            category_label(Some(law.category.as_str())),
            title
        );
        let ministry = law.responsible_ministry.as_deref().unwrap_or("-");
        println!("  {:<10} {} · 시행 {}", "", ministry, law.start_date);
        if let Some(summary) = law.one_line_summary.as_deref().filter(|s| !s.is_empty()) {
            println!("  {:<10} {}", "", summary);
        }
    }
    print_page_footer(view);
}

pub fn print_bill_list(view: &ListView<BillListItem>, state: &FilterState<Bills>) {
    print_page_header(view, "bills");
    for bill in &view.items {
        let name = bill.bill_nm.as_deref().unwrap_or("(제목 없음)");
        let name = emphasise(name, &highlight_ranges(name, &state.search));
        let category = bill
            .category()
            .map(Category::label)
            .unwrap_or("알 수 없음");
        println!("  {:<10} [{}] {}", bill.bill_no, category, name);
        println!(
            "  {:<10} {} · 의결 {}",
            "",
            bill.jrcmit_nm.as_deref().unwrap_or("-"),
            bill.rgs_rsln_dt.as_deref().unwrap_or("-")
        );
    }
    print_page_footer(view);
}

fn print_page_header<T>(view: &ListView<T>, noun: &str) {
    if view.total_count == 0 {
        println!("No {noun} match.");
        return;
    }
    println!(
        "{} {noun} · page {}/{}",
        view.total_count, view.page, view.total_pages
    );
    if view.clamped {
        println!("(requested page is past the end; showing page 1)");
    }
    println!();
}

fn print_page_footer<T>(view: &ListView<T>) {
    if view.page < view.total_pages {
        println!();
        println!("  next: --page {}", view.page + 1);
    }
}

/// Wrap each range of `text` in `[` `]`.
fn emphasise(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut last = 0;
    for r in ranges {
        out.push_str(&text[last..r.start]);
        out.push('[');
        out.push_str(&text[r.clone()]);
        out.push(']');
        last = r.end;
    }
    out.push_str(&text[last..]);
    out
}

pub fn print_notice(e: &ViewError) {
    match e.cached_at {
        Some(at) => eprintln!("! {} (저장 시각 {})", e.message, at.format("%Y-%m-%d %H:%M UTC")),
        None => eprintln!("! {}", e.message),
    }
    eprintln!();
}

// ── Law detail ──

pub fn print_law(view: &LawView, highlighted: Option<usize>, with_original: bool) {
    let detail = &view.detail;
    println!(
        "=== {} ===",
        detail.title.as_deref().unwrap_or(&detail.law_id)
    );
    if let Some(summary) = detail.one_line_summary.as_deref() {
        println!("{summary}");
    }
    println!();

    println!("Identity");
    row("law_id", &detail.law_id);
    row("category", &category_label(detail.category.as_deref()));
    opt_row("ministry", detail.responsible_ministry.as_deref());
    opt_row("start_date", detail.start_date.as_deref());
    opt_row("original_link", detail.original_link.as_deref());
    opt_row("generated_at", detail.generated_at.as_deref());
    println!();

    if view.parsed.is_empty() {
        println!("(no summary yet)");
        println!();
    } else {
        print_parsed(&view.parsed, highlighted);
    }

    if with_original && let Some(original) = &view.original {
        println!("Original Text");
        for p in paragraphs(original) {
            if is_item_paragraph(p) {
                println!("  {p}");
            } else {
                println!("    {p}");
            }
        }
        println!();
    }
}

pub fn print_cards(cards: &CardNews, base_url: &str) {
    if let Some(e) = cards.error() {
        eprintln!("! card news: {}", e.message);
        return;
    }
    let Some(deck) = cards.deck().filter(|d| !d.is_empty()) else {
        println!("(no card news)");
        return;
    };
    println!("Card News ({})", deck.len());
    let mut deck = deck.clone();
    loop {
        if let Some(url) = deck.current_url(base_url) {
            println!("  {:>2}. {url}", deck.position() + 1);
        }
        if !deck.next() {
            break;
        }
    }
    println!();
}

/// Sections of a parsed summary. Bold glossary terms in the explanation are
/// tagged with their glossary number; `highlighted` marks one entry.
pub fn print_parsed(parsed: &ParsedMarkdown, highlighted: Option<usize>) {
    if !parsed.law_info.is_empty() {
        println!("Law Info");
        for line in parsed.law_info.lines() {
            println!("  {line}");
        }
        println!();
    }

    if !parsed.easy_explanation.is_empty() {
        println!("Explanation");
        for line in mark_glossary_terms(parsed).lines() {
            println!("  {line}");
        }
        println!();
    }

    if let Some(compare) = &parsed.compare {
        println!("Before / After");
        println!("  {:<8} {}", "before", compare.before);
        println!("  {:<8} {}", "after", compare.after);
        println!();
    }

    if !parsed.term_dictionary.is_empty() {
        println!("Glossary ({})", parsed.term_dictionary.len());
        for (i, entry) in parsed.term_dictionary.iter().enumerate() {
            let marker = if highlighted == Some(i) { '>' } else { ' ' };
            println!("{marker} [{}] {}: {}", i + 1, entry.term, entry.definition);
        }
        println!();
    }
}

/// The explanation with `**bold**` markers removed and glossary terms
/// followed by `[n]`.
fn mark_glossary_terms(parsed: &ParsedMarkdown) -> String {
    let text = &parsed.easy_explanation;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in parsed.bold_spans() {
        out.push_str(&text[last..span.range.start]);
        out.push_str(&span.text);
        if let Some(i) = span.glossary_index {
            out.push_str(&format!("[{}]", i + 1));
        }
        last = span.range.end;
    }
    out.push_str(&text[last..]);
    out
}

// ── Bill detail ──

pub fn print_bill(bill: &BillPresentation) {
    let detail = &bill.detail;
    println!(
        "=== {} ===",
        detail.bill_nm.as_deref().unwrap_or(&detail.bill_no)
    );
    println!();

    println!("Identity");
    row("bill_no", &detail.bill_no);
    row("category", bill.category_name);
    opt_row("committee", detail.jrcmit_nm.as_deref());
    opt_row("law", detail.prom_law_nm.as_deref());
    opt_row("law_summary", bill.law_id.as_deref());
    println!();

    println!("Dates");
    opt_row("plenary", detail.rgs_rsln_dt.as_deref());
    opt_row("sent_to_gov", detail.gvrn_trsf_dt.as_deref());
    opt_row("promulgated", detail.prom_dt.as_deref());
    opt_row("prom_no", bill.prom_no.as_deref());
    opt_row("enforcement", detail.enforcement_date.as_deref());
    opt_row("status", detail.enforcement_status.as_deref());
    println!();

    print_text("Summary", detail.bill_summary.as_deref());
    print_list("Major Changes", &bill.major_changes);
    print_list("Who Is Affected", &bill.target_audience);
    print_text("Proposal Reason", detail.proposal_reason.as_deref());
    print_text("Core Changes", detail.core_content_changes.as_deref());
    print_text("Committee Arguments", detail.committee_arguments.as_deref());
    print_text("Expected Effects", detail.expected_effects.as_deref());
    print_text("Risks", detail.risks.as_deref());
    print_text("Enforcement", detail.enforcement_details.as_deref());

    if !bill.sources.is_empty() {
        println!("Sources ({})", bill.sources.len());
        for source in &bill.sources {
            println!("  {}", source.title);
            println!("      {}", source.url);
        }
        println!();
    }
}

fn print_text(header: &str, text: Option<&str>) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    println!("{header}");
    for line in text.lines() {
        println!("  {line}");
    }
    println!();
}

fn print_list(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{header} ({})", items.len());
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("  - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        println!("    ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
    println!();
}

// ── Filter state ──

pub fn print_state<K: ListKind>(state: &FilterState<K>) {
    let categories = if state.categories.is_empty() {
        "(all)".to_string()
    } else {
        state
            .categories
            .iter()
            .map(|c| c.token())
            .collect::<Vec<_>>()
            .join(", ")
    };
    row("category", &categories);
    row("search", &state.search);
    row("search_type", state.search_type.token());
    opt_row(
        "date_start",
        state.dates.start.map(|d| d.to_string()).as_deref(),
    );
    opt_row("date_end", state.dates.end.map(|d| d.to_string()).as_deref());
    row("order_by", state.order_by.token());
    row("page", &state.page.to_string());
    opt_row(K::ID_PARAM, state.selected.as_deref());
    println!();
    println!("{}", state.encode());
}

fn row(label: &str, value: &str) {
    println!("  {:<16} {}", label, value);
}

fn opt_row(label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        row(label, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawpick_core::markdown::parse;

    #[test]
    fn glossary_terms_are_numbered_in_the_explanation() {
        let parsed = parse(
            "## 1. 무엇이 바뀌나요\n**전세보증금**과 **월세**가 **보호**됩니다\n\
             ## 📚 주요 용어 설명\n- **월세**: 매달 내는 임대료\n- **전세보증금**: 맡기는 돈",
        );
        assert_eq!(
            mark_glossary_terms(&parsed),
            "## 1. 무엇이 바뀌나요\n전세보증금[2]과 월세[1]가 보호됩니다"
        );
    }

    #[test]
    fn emphasise_wraps_each_range() {
        let text = "주택임대차보호법 주택";
        assert_eq!(
            emphasise(text, &highlight_ranges(text, "주택")),
            "[주택]임대차보호법 [주택]"
        );
    }
}
