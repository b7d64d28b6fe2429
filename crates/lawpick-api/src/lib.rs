//! REST client for the Lawpick backend: law list/detail/cards and
//! youth-proposal bill list/detail.

mod backend;
mod client;
mod error;

pub use backend::{BillBackend, LawBackend, ListBackend, ListQuery};
pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ListEndpoint};
pub use error::ApiError;
