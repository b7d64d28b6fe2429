//! Focus on one list record, anchored to the URL's id parameter.

use tracing::{debug, info};

use crate::error::ViewError;

/// The open detail view: which id is selected, its record once loaded, or
/// the inline error of the last attempt.
///
/// The focus only exists while the URL carries the id; [`DetailFocus::sync`]
/// with `None` drops everything.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailFocus<T> {
    id: Option<String>,
    record: Option<T>,
    error: Option<ViewError>,
    loading: bool,
    last_seq: u64,
}

impl<T> Default for DetailFocus<T> {
    fn default() -> Self {
        Self {
            id: None,
            record: None,
            error: None,
            loading: false,
            last_seq: 0,
        }
    }
}

/// A numbered detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: String,
}

impl<T> DetailFocus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the URL's id parameter. Returns `true` when the selected
    /// record still has to be fetched.
    pub fn sync(&mut self, selected: Option<&str>) -> bool {
        match selected {
            None => {
                if self.id.is_some() {
                    debug!("detail id left the url; clearing focus");
                }
                *self = Self {
                    last_seq: self.last_seq,
                    ..Self::default()
                };
                false
            }
            Some(id) if self.id.as_deref() == Some(id) => {
                self.record.is_none() && self.error.is_none() && !self.loading
            }
            Some(id) => {
                self.id = Some(id.to_string());
                self.record = None;
                self.error = None;
                self.loading = false;
                true
            }
        }
    }

    /// Issue a request for the selected id.
    pub fn begin(&mut self) -> Option<DetailTicket> {
        let id = self.id.clone()?;
        self.last_seq += 1;
        self.loading = true;
        self.error = None;
        Some(DetailTicket {
            seq: self.last_seq,
            id,
        })
    }

    /// Apply a result if it belongs to the latest request for the current id.
    pub fn finish(&mut self, ticket: &DetailTicket, result: Result<T, ViewError>) -> bool {
        if ticket.seq != self.last_seq || self.id.as_deref() != Some(ticket.id.as_str()) {
            info!(id = %ticket.id, seq = ticket.seq, "discarding stale detail response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.error = None;
            }
            Err(e) => {
                self.record = None;
                self.error = Some(e);
            }
        }
        true
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_open(&self) -> bool {
        self.id.is_some()
    }
}
