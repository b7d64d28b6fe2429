//! Hover synchronisation between explanation terms and the glossary panel.
//!
//! Hovering a highlighted term scrolls its glossary entry to the centre of
//! the glossary panel and highlights it; leaving clears the highlight. The
//! presentation layer supplies the scrolling through [`ScrollTarget`], so the
//! logic here only tracks the single hovered term.

use crate::markdown::{GlossaryTerm, ParsedMarkdown};

/// Presentation capability for the glossary panel. Entries are addressed by
/// their index in [`ParsedMarkdown::term_dictionary`].
pub trait ScrollTarget {
    /// Smooth-scroll the entry into the vertical centre of its panel.
    /// A later call supersedes an unfinished earlier one.
    fn scroll_into_center(&mut self, index: usize);

    fn set_highlight(&mut self, index: Option<usize>);
}

/// The single "currently hovered term" of a law view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermHover {
    hovered: Option<String>,
}

impl TermHover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered a bold term. Returns `false` when the term is not in
    /// the glossary, in which case nothing changes.
    pub fn enter<S: ScrollTarget>(
        &mut self,
        parsed: &ParsedMarkdown,
        term: &str,
        target: &mut S,
    ) -> bool {
        let Some(index) = parsed.term_index(term) else {
            return false;
        };
        if self.hovered.as_deref() == Some(term) {
            return true;
        }
        self.hovered = Some(term.to_string());
        target.set_highlight(Some(index));
        target.scroll_into_center(index);
        true
    }

    /// Pointer left the term.
    pub fn leave<S: ScrollTarget>(&mut self, target: &mut S) {
        if self.hovered.take().is_some() {
            target.set_highlight(None);
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn hovered_entry<'a>(&self, parsed: &'a ParsedMarkdown) -> Option<&'a GlossaryTerm> {
        self.hovered.as_deref().and_then(|t| parsed.lookup_term(t))
    }

    /// Whether the glossary entry at `index` should render highlighted.
    pub fn is_highlighted(&self, parsed: &ParsedMarkdown, index: usize) -> bool {
        self.hovered
            .as_deref()
            .and_then(|t| parsed.term_index(t))
            .is_some_and(|i| i == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    #[derive(Default)]
    struct RecordingPanel {
        scrolls: Vec<usize>,
        highlight: Option<usize>,
    }

    impl ScrollTarget for RecordingPanel {
        fn scroll_into_center(&mut self, index: usize) {
            self.scrolls.push(index);
        }

        fn set_highlight(&mut self, index: Option<usize>) {
            self.highlight = index;
        }
    }

    fn sample() -> ParsedMarkdown {
        parse(
            "## 1. 설명\n**임차인**과 **임대인**\n## 📚 주요 용어 설명\n\
             - **임차인**: 빌리는 사람\n- **임대인**: 빌려주는 사람\n- **임차인**: 세입자",
        )
    }

    #[test]
    fn enter_scrolls_and_highlights_last_matching_entry() {
        let parsed = sample();
        let mut hover = TermHover::new();
        let mut panel = RecordingPanel::default();

        assert!(hover.enter(&parsed, "임차인", &mut panel));
        assert_eq!(panel.scrolls, vec![2]);
        assert_eq!(panel.highlight, Some(2));
        assert_eq!(hover.hovered_entry(&parsed).unwrap().definition, "세입자");
        assert!(hover.is_highlighted(&parsed, 2));
        assert!(!hover.is_highlighted(&parsed, 0));
    }

    #[test]
    fn unknown_term_is_ignored() {
        let parsed = sample();
        let mut hover = TermHover::new();
        let mut panel = RecordingPanel::default();

        assert!(!hover.enter(&parsed, "청년", &mut panel));
        assert!(panel.scrolls.is_empty());
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn new_hover_retargets_without_leave() {
        let parsed = sample();
        let mut hover = TermHover::new();
        let mut panel = RecordingPanel::default();

        hover.enter(&parsed, "임차인", &mut panel);
        hover.enter(&parsed, "임대인", &mut panel);
        assert_eq!(panel.scrolls, vec![2, 1]);
        assert_eq!(panel.highlight, Some(1));
        assert_eq!(hover.hovered(), Some("임대인"));
    }

    #[test]
    fn leave_clears_highlight() {
        let parsed = sample();
        let mut hover = TermHover::new();
        let mut panel = RecordingPanel::default();

        hover.enter(&parsed, "임대인", &mut panel);
        hover.leave(&mut panel);
        assert_eq!(panel.highlight, None);
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn repeated_enter_on_same_term_scrolls_once() {
        let parsed = sample();
        let mut hover = TermHover::new();
        let mut panel = RecordingPanel::default();

        hover.enter(&parsed, "임대인", &mut panel);
        hover.enter(&parsed, "임대인", &mut panel);
        assert_eq!(panel.scrolls, vec![1]);
    }
}
