//! Card-news slide paging.

use crate::model::LawCards;

/// One law's card-news slides and the slide on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDeck {
    images: Vec<String>,
    current: usize,
}

impl CardDeck {
    /// A freshly loaded deck always starts on the first slide.
    pub fn new(images: Vec<String>) -> Self {
        Self { images, current: 0 }
    }

    pub fn from_cards(cards: &LawCards) -> Self {
        Self::new(cards.images.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Zero-based index of the slide on screen.
    pub fn position(&self) -> usize {
        self.current
    }

    /// Image path of the slide on screen.
    pub fn current(&self) -> Option<&str> {
        self.images.get(self.current).map(String::as_str)
    }

    /// Absolute URL of the slide on screen. Image paths are relative to the API host.
    pub fn current_url(&self, base_url: &str) -> Option<String> {
        self.current().map(|path| {
            if path.starts_with("http://") || path.starts_with("https://") {
                path.to_string()
            } else {
                format!("{}{}", base_url.trim_end_matches('/'), path)
            }
        })
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.images.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Advance one slide. Returns `false` on the last slide.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one slide. Returns `false` on the first slide.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a slide from the dot indicator. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Progress-bar fill, `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.images.is_empty() {
            0.0
        } else {
            (self.current + 1) as f32 / self.images.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> CardDeck {
        CardDeck::new((0..n).map(|i| format!("/static/cards/{i}.png")).collect())
    }

    #[test]
    fn paging_is_bounded() {
        let mut d = deck(3);
        assert!(!d.previous());
        assert!(d.next());
        assert!(d.next());
        assert!(!d.next());
        assert_eq!(d.position(), 2);
        assert!(d.previous());
        assert_eq!(d.current(), Some("/static/cards/1.png"));
    }

    #[test]
    fn empty_deck() {
        let mut d = CardDeck::default();
        assert!(d.is_empty());
        assert_eq!(d.current(), None);
        assert!(!d.next());
        assert_eq!(d.progress(), 0.0);
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut d = deck(2);
        assert!(d.go_to(1));
        assert!(!d.go_to(5));
        assert_eq!(d.position(), 1);
        assert_eq!(d.progress(), 1.0);
    }

    #[test]
    fn current_url_joins_base() {
        let d = deck(1);
        assert_eq!(
            d.current_url("http://localhost:8000/").as_deref(),
            Some("http://localhost:8000/static/cards/0.png")
        );
        let d = CardDeck::new(vec!["https://cdn.example/a.png".into()]);
        assert_eq!(d.current_url("http://x").as_deref(), Some("https://cdn.example/a.png"));
    }

    #[test]
    fn reload_resets_to_first_slide() {
        let cards = LawCards {
            law_id: "1".into(),
            images: vec!["/a".into(), "/b".into()],
            cached: true,
            total_cards: 2,
        };
        let mut d = CardDeck::from_cards(&cards);
        d.next();
        d = CardDeck::from_cards(&cards);
        assert_eq!(d.position(), 0);
    }
}
