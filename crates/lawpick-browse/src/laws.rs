//! Law summary browser: the law list, the open law with its parsed
//! markdown, glossary hover, and lazily loaded card news.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lawpick_api::{LawBackend, ListBackend};
use lawpick_core::cards::CardDeck;
use lawpick_core::glossary::{ScrollTarget, TermHover};
use lawpick_core::kinds::{LawOrder, Laws};
use lawpick_core::markdown::{self, ParsedMarkdown};
use lawpick_core::model::{Category, LawDetail};
use lawpick_core::original_text::format_original_content;
use tracing::{debug, warn};

use crate::controller::{ListController, LoadOutcome};
use crate::detail::DetailFocus;
use crate::error::ViewError;
use crate::url::UrlUpdate;

/// A loaded law with its derived sections.
#[derive(Debug, Clone, PartialEq)]
pub struct LawView {
    pub detail: LawDetail,
    /// Empty when the record has no markdown.
    pub parsed: ParsedMarkdown,
    /// Reflowed statute text.
    pub original: Option<String>,
}

impl From<LawDetail> for LawView {
    fn from(detail: LawDetail) -> Self {
        let parsed = detail
            .markdown
            .as_deref()
            .map(markdown::parse)
            .unwrap_or_default();
        let original = detail
            .original_content
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(format_original_content);
        Self {
            detail,
            parsed,
            original,
        }
    }
}

/// Card-news slides of the open law, fetched on first request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardNews {
    law_id: Option<String>,
    deck: Option<CardDeck>,
    error: Option<ViewError>,
}

impl CardNews {
    pub fn deck(&self) -> Option<&CardDeck> {
        self.deck.as_ref()
    }

    pub fn deck_mut(&mut self) -> Option<&mut CardDeck> {
        self.deck.as_mut()
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }
}

#[derive(Default)]
pub struct LawBrowser {
    list: ListController<Laws>,
    detail: DetailFocus<LawView>,
    cards: CardNews,
    hover: TermHover,
}

impl LawBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &ListController<Laws> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<Laws> {
        &mut self.list
    }

    pub fn detail(&self) -> &DetailFocus<LawView> {
        &self.detail
    }

    pub fn cards(&self) -> &CardNews {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardNews {
        &mut self.cards
    }

    pub fn hover(&self) -> &TermHover {
        &self.hover
    }

    // ── URL-driven actions ──

    pub fn navigate(&mut self, query: &str) -> Option<UrlUpdate> {
        let update = self.list.navigate(query);
        self.sync_detail();
        update
    }

    pub fn toggle_category(&mut self, category: Category) -> UrlUpdate {
        let update = self.list.toggle_category(category);
        self.sync_detail();
        update
    }

    pub fn set_categories(&mut self, categories: BTreeSet<Category>) -> UrlUpdate {
        let update = self.list.set_categories(categories);
        self.sync_detail();
        update
    }

    pub fn set_order(&mut self, order: LawOrder) -> UrlUpdate {
        self.list.set_order(order)
    }

    pub fn open_law(&mut self, law_id: &str) -> UrlUpdate {
        let update = self.list.open_detail(law_id);
        self.sync_detail();
        update
    }

    pub fn close_law(&mut self) -> UrlUpdate {
        let update = self.list.close_detail();
        self.sync_detail();
        update
    }

    fn sync_detail(&mut self) {
        let before = self.detail.id().map(str::to_string);
        self.detail.sync(self.list.selected());
        if self.detail.id() != before.as_deref() {
            self.cards = CardNews::default();
            self.hover = TermHover::new();
        }
    }

    // ── Loading ──

    pub async fn load_list<B>(&mut self, backend: &B, now: DateTime<Utc>) -> LoadOutcome
    where
        B: ListBackend<Laws> + ?Sized,
    {
        self.list.reload(backend, now).await
    }

    /// Fetch the selected law if it is not loaded yet.
    pub async fn load_detail<B: LawBackend + ?Sized>(&mut self, backend: &B) {
        if self.detail.record().is_none() && self.detail.error().is_none() {
            self.fetch_detail(backend).await;
        }
    }

    /// Fetch the selected law again, e.g. after an inline error.
    pub async fn retry_detail<B: LawBackend + ?Sized>(&mut self, backend: &B) {
        self.fetch_detail(backend).await;
    }

    async fn fetch_detail<B: LawBackend + ?Sized>(&mut self, backend: &B) {
        let Some(ticket) = self.detail.begin() else {
            return;
        };
        let result = backend
            .law_detail(&ticket.id)
            .await
            .map(LawView::from)
            .map_err(ViewError::from);
        if let Err(e) = &result {
            warn!(law_id = %ticket.id, error = %e, "law detail failed");
        }
        self.detail.finish(&ticket, result);
    }

    /// Fetch card news for the open law, once. A failed fetch is retried on
    /// the next call.
    pub async fn load_cards<B: LawBackend + ?Sized>(&mut self, backend: &B) {
        let Some(law_id) = self.detail.id().map(str::to_string) else {
            return;
        };
        if self.cards.law_id.as_deref() == Some(law_id.as_str()) && self.cards.error.is_none() {
            debug!(law_id = %law_id, "card news already requested");
            return;
        }
        self.cards.law_id = Some(law_id.clone());
        let result = backend.law_cards(&law_id).await;
        if self.detail.id() != Some(law_id.as_str()) {
            return;
        }
        match result {
            Ok(cards) => {
                self.cards.deck = Some(CardDeck::from_cards(&cards));
                self.cards.error = None;
            }
            Err(e) => {
                warn!(law_id = %law_id, error = %e, "card news failed");
                self.cards.deck = None;
                self.cards.error = Some(ViewError::from(&e));
            }
        }
    }

    // ── Glossary hover ──

    /// Pointer entered a bold term of the open law's explanation.
    pub fn hover_term<S: ScrollTarget>(&mut self, term: &str, target: &mut S) -> bool {
        match self.detail.record() {
            Some(view) => self.hover.enter(&view.parsed, term, target),
            None => false,
        }
    }

    pub fn leave_term<S: ScrollTarget>(&mut self, target: &mut S) {
        self.hover.leave(target);
    }
}
