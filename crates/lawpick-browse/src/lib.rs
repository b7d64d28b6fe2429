//! Controllers behind the Lawpick list and detail views.
//!
//! State lives in the URL query string: every user action returns the
//! [`UrlUpdate`] to write, and [`ListController::navigate`] rebuilds state
//! from whatever query the reader lands on.

pub mod bills;
pub mod controller;
pub mod detail;
pub mod error;
pub mod laws;
pub mod url;

pub use bills::BillBrowser;
pub use controller::{ListController, LoadOutcome, LoadTicket, SearchDraft, fetch_union, merge_union};
pub use detail::{DetailFocus, DetailTicket};
pub use error::{ErrorKind, ViewError};
pub use laws::{CardNews, LawBrowser, LawView};
pub use url::{History, UrlUpdate};
