use chrono::{DateTime, Utc};
use lawpick_api::ApiError;
use thiserror::Error;

pub const NETWORK_MESSAGE: &str = "데이터 서버에 연결하지 못했습니다. 잠시 후 다시 시도해주세요.";
pub const CACHE_MESSAGE: &str = "실시간 데이터를 불러오지 못해 최근 저장된 데이터를 표시합니다.";
pub const DECODE_MESSAGE: &str = "서버 응답을 해석하지 못했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure. Offer retry and a server-status link.
    Network,
    /// Transport failure with a fresh fallback list on screen.
    Cache,
    /// The backend answered with an error.
    General,
}

/// An error as shown to the reader. Every kind is recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<String>,
    /// When the fallback list was fetched, for [`ErrorKind::Cache`].
    pub cached_at: Option<DateTime<Utc>>,
}

impl ViewError {
    pub fn network() -> Self {
        Self {
            kind: ErrorKind::Network,
            message: NETWORK_MESSAGE.to_string(),
            detail: None,
            cached_at: None,
        }
    }

    pub fn cache(cached_at: DateTime<Utc>) -> Self {
        Self {
            kind: ErrorKind::Cache,
            message: CACHE_MESSAGE.to_string(),
            detail: None,
            cached_at: Some(cached_at),
        }
    }

    pub fn general(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind: ErrorKind::General,
            message: message.into(),
            detail,
            cached_at: None,
        }
    }

    pub fn is_stale_notice(&self) -> bool {
        self.kind == ErrorKind::Cache
    }
}

impl From<&ApiError> for ViewError {
    fn from(e: &ApiError) -> Self {
        match e {
            ApiError::Network(_) => ViewError::network(),
            ApiError::Server { status, message } => {
                ViewError::general(message.clone(), Some(format!("HTTP {status}")))
            }
            ApiError::Json(detail) => ViewError::general(DECODE_MESSAGE, Some(detail.clone())),
        }
    }
}

impl From<ApiError> for ViewError {
    fn from(e: ApiError) -> Self {
        ViewError::from(&e)
    }
}
