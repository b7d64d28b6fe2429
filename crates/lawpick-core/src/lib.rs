pub mod bill;
pub mod cards;
pub mod glossary;
pub mod kinds;
pub mod listing;
pub mod markdown;
pub mod model;
pub mod original_text;
pub mod query;

pub use bill::BillPresentation;
pub use cards::CardDeck;
pub use glossary::{ScrollTarget, TermHover};
pub use kinds::{BillOrder, BillSearchType, Bills, LawOrder, LawSearchType, Laws};
pub use listing::{ListKind, ListView, project};
pub use markdown::{ParsedMarkdown, parse as parse_markdown};
pub use model::{BillDetail, BillListItem, Category, LawCards, LawDetail, LawListItem};
pub use query::{DateRange, FilterState, QueryToken, SearchMode};
