//! HTTP client for the Lawpick backend.

use std::time::Duration;

use async_trait::async_trait;
use lawpick_core::kinds::{Bills, Laws};
use lawpick_core::listing::ListKind;
use lawpick_core::model::{
    BillDetail, BillListItem, BillListResponse, LawCards, LawDetail, LawListItem, LawListPage,
};
use lawpick_core::query::QueryToken;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::backend::{BillBackend, LawBackend, ListBackend, ListQuery};
use crate::error::{ApiError, server_message};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const LAW_LIST_PATH: &str = "/api/v1/law/list";
const LAW_PATH: &str = "/api/v1/law";
const BILL_LIST_PATH: &str = "/api/v1/youth-proposals";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How a list kind maps onto its endpoint.
pub trait ListEndpoint: ListKind {
    const PATH: &'static str;

    type Response: DeserializeOwned + Send;

    /// Query parameters for `query`, absent values omitted.
    fn params(query: &ListQuery<Self>) -> Vec<(&'static str, String)>;

    fn into_items(response: Self::Response) -> Vec<Self::Item>;
}

fn search_params<K: ListKind>(query: &ListQuery<K>, params: &mut Vec<(&'static str, String)>) {
    if let Some(search) = &query.search {
        params.push(("search", search.clone()));
    }
    if let Some(search_type) = query.search_type {
        params.push(("search_type", search_type.token().to_string()));
    }
    if let Some(start) = query.dates.start {
        params.push(("date_start", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = query.dates.end {
        params.push(("date_end", end.format("%Y-%m-%d").to_string()));
    }
    if let Some(order_by) = query.order_by {
        params.push(("order_by", order_by.token().to_string()));
    }
}

impl ListEndpoint for Laws {
    const PATH: &'static str = LAW_LIST_PATH;

    type Response = LawListPage;

    fn params(query: &ListQuery<Self>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = query.category {
            params.push(("category", category.token().to_string()));
        }
        params.push(("page", "1".to_string()));
        params.push(("size", query.size.to_string()));
        search_params(query, &mut params);
        params
    }

    fn into_items(response: LawListPage) -> Vec<LawListItem> {
        response.items
    }
}

impl ListEndpoint for Bills {
    const PATH: &'static str = BILL_LIST_PATH;

    type Response = BillListResponse;

    fn params(query: &ListQuery<Self>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = query.category {
            params.push(("category", category.code().to_string()));
        }
        params.push(("limit", query.size.to_string()));
        search_params(query, &mut params);
        params
    }

    fn into_items(response: BillListResponse) -> Vec<BillListItem> {
        response.proposals
    }
}

/// REST client for the law and youth-proposal endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path` with `params` appended.
    pub fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(url = %url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(status.as_u16(), &body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl<K: ListEndpoint> ListBackend<K> for ApiClient {
    async fn fetch_list(&self, query: &ListQuery<K>) -> Result<Vec<K::Item>, ApiError> {
        let url = self.url(K::PATH, &K::params(query));
        info!(url = %url, "fetching list");
        let response: K::Response = self.get_json(&url).await?;
        let items = K::into_items(response);
        info!(count = items.len(), "fetched list");
        Ok(items)
    }
}

#[async_trait]
impl LawBackend for ApiClient {
    async fn law_detail(&self, law_id: &str) -> Result<LawDetail, ApiError> {
        let url = self.url(&format!("{LAW_PATH}/{}", urlencoding::encode(law_id)), &[]);
        info!(url = %url, "fetching law detail");
        self.get_json(&url).await
    }

    async fn law_cards(&self, law_id: &str) -> Result<LawCards, ApiError> {
        let url = self.url(&format!("{LAW_PATH}/{}/cards", urlencoding::encode(law_id)), &[]);
        info!(url = %url, "fetching law cards");
        let cards: LawCards = self.get_json(&url).await?;
        info!(count = cards.images.len(), cached = cards.cached, "fetched law cards");
        Ok(cards)
    }
}

#[async_trait]
impl BillBackend for ApiClient {
    async fn bill_detail(&self, bill_no: &str) -> Result<BillDetail, ApiError> {
        let url = self.url(
            &format!("{BILL_LIST_PATH}/{}", urlencoding::encode(bill_no)),
            &[],
        );
        info!(url = %url, "fetching bill detail");
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawpick_core::kinds::{BillSearchType, LawOrder};
    use lawpick_core::model::Category;
    use pretty_assertions::assert_eq;

    fn client() -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: "http://localhost:8000/".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn api_client_trims_trailing_slash() {
        assert_eq!(client().base_url(), "http://localhost:8000");
    }

    #[test]
    fn unfiltered_law_list_url() {
        let query = ListQuery::<Laws>::default();
        let c = client();
        assert_eq!(
            c.url(Laws::PATH, &Laws::params(&query)),
            "http://localhost:8000/api/v1/law/list?page=1&size=1000"
        );
    }

    #[test]
    fn law_list_url_with_category_and_search() {
        let query = ListQuery::<Laws> {
            category: Some(Category::RealEstate),
            search: Some("전세 사기".into()),
            order_by: Some(LawOrder::Title),
            ..Default::default()
        };
        assert_eq!(
            client().url(Laws::PATH, &Laws::params(&query)),
            "http://localhost:8000/api/v1/law/list?category=real_estate&page=1&size=1000\
             &search=%EC%A0%84%EC%84%B8%20%EC%82%AC%EA%B8%B0&order_by=title"
        );
    }

    #[test]
    fn bill_list_sends_numeric_category() {
        let query = ListQuery::<Bills> {
            category: Some(Category::Finance),
            search: Some("청년".into()),
            search_type: Some(BillSearchType::PromNo),
            ..Default::default()
        };
        let params = Bills::params(&query);
        assert_eq!(
            params,
            vec![
                ("category", "3".to_string()),
                ("limit", "100".to_string()),
                ("search", "청년".to_string()),
                ("search_type", "prom_no".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let c = ApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let err = c.law_detail("001234").await.unwrap_err();
        assert!(err.is_network(), "{err:?}");
    }
}
