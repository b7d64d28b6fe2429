//! Youth-proposal bill browser: the cached bill list and the open bill.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lawpick_api::{BillBackend, ListBackend};
use lawpick_core::bill::BillPresentation;
use lawpick_core::kinds::{BillOrder, Bills};
use lawpick_core::model::Category;
use lawpick_store::{ListCache, Storage};
use tracing::warn;

use crate::controller::{ListController, LoadOutcome};
use crate::detail::DetailFocus;
use crate::error::ViewError;
use crate::url::UrlUpdate;

pub struct BillBrowser {
    list: ListController<Bills>,
    detail: DetailFocus<BillPresentation>,
}

impl BillBrowser {
    /// A browser whose unfiltered list is mirrored into `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            list: ListController::new().with_cache(ListCache::bills(storage)),
            detail: DetailFocus::new(),
        }
    }

    pub fn list(&self) -> &ListController<Bills> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<Bills> {
        &mut self.list
    }

    pub fn detail(&self) -> &DetailFocus<BillPresentation> {
        &self.detail
    }

    // ── URL-driven actions ──

    pub fn navigate(&mut self, query: &str) -> Option<UrlUpdate> {
        let update = self.list.navigate(query);
        self.detail.sync(self.list.selected());
        update
    }

    pub fn toggle_category(&mut self, category: Category) -> UrlUpdate {
        let update = self.list.toggle_category(category);
        self.detail.sync(self.list.selected());
        update
    }

    pub fn set_categories(&mut self, categories: BTreeSet<Category>) -> UrlUpdate {
        let update = self.list.set_categories(categories);
        self.detail.sync(self.list.selected());
        update
    }

    pub fn set_order(&mut self, order: BillOrder) -> UrlUpdate {
        self.list.set_order(order)
    }

    pub fn open_bill(&mut self, bill_no: &str) -> UrlUpdate {
        let update = self.list.open_detail(bill_no);
        self.detail.sync(self.list.selected());
        update
    }

    pub fn close_bill(&mut self) -> UrlUpdate {
        let update = self.list.close_detail();
        self.detail.sync(None);
        update
    }

    // ── Loading ──

    pub async fn load_list<B>(&mut self, backend: &B, now: DateTime<Utc>) -> LoadOutcome
    where
        B: ListBackend<Bills> + ?Sized,
    {
        self.list.reload(backend, now).await
    }

    /// Fetch the selected bill unless it is loaded or failed already.
    pub async fn load_detail<B: BillBackend + ?Sized>(&mut self, backend: &B) {
        if self.detail.record().is_none() && self.detail.error().is_none() {
            self.fetch_detail(backend).await;
        }
    }

    /// Fetch the selected bill again, e.g. after an inline error.
    pub async fn retry_detail<B: BillBackend + ?Sized>(&mut self, backend: &B) {
        self.fetch_detail(backend).await;
    }

    async fn fetch_detail<B: BillBackend + ?Sized>(&mut self, backend: &B) {
        let Some(ticket) = self.detail.begin() else {
            return;
        };
        let result = backend
            .bill_detail(&ticket.id)
            .await
            .map(BillPresentation::from)
            .map_err(ViewError::from);
        if let Err(e) = &result {
            warn!(bill_no = %ticket.id, error = %e, "bill detail failed");
        }
        self.detail.finish(&ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use lawpick_api::{ApiError, ListQuery};
    use lawpick_core::model::{BillDetail, BillListItem};
    use lawpick_store::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn bill(no: &str, code: u8) -> BillListItem {
        BillListItem {
            bill_no: no.into(),
            bill_nm: Some(format!("{no} 개정법률안")),
            bill_summary: None,
            rgs_rsln_dt: Some("2024-05-01".into()),
            jrcmit_nm: Some("국토교통위원회".into()),
            is_youth_proposal: code,
        }
    }

    enum Reply {
        Bills(Vec<BillListItem>),
        Down,
        Broken,
    }

    struct FakeBills {
        reply: Mutex<Reply>,
    }

    impl FakeBills {
        fn new(reply: Reply) -> Self {
            Self {
                reply: Mutex::new(reply),
            }
        }

        fn set(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }
    }

    #[async_trait]
    impl ListBackend<Bills> for FakeBills {
        async fn fetch_list(&self, query: &ListQuery<Bills>) -> Result<Vec<BillListItem>, ApiError> {
            match &*self.reply.lock().unwrap() {
                Reply::Bills(all) => Ok(all
                    .iter()
                    .filter(|b| query.category.is_none_or(|c| b.category() == Some(c)))
                    .cloned()
                    .collect()),
                Reply::Down => Err(ApiError::Network("connection refused".into())),
                Reply::Broken => Err(ApiError::Server {
                    status: 500,
                    message: "데이터베이스 오류".into(),
                }),
            }
        }
    }

    #[async_trait]
    impl BillBackend for FakeBills {
        async fn bill_detail(&self, bill_no: &str) -> Result<BillDetail, ApiError> {
            if matches!(*self.reply.lock().unwrap(), Reply::Down) {
                return Err(ApiError::Network("connection refused".into()));
            }
            Ok(BillDetail {
                bill_no: bill_no.into(),
                is_youth_proposal: 1,
                prom_no: Some("123".into()),
                major_changes: Some("전세 보증 확대; 청년 우대".into()),
                ..Default::default()
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn seeded() -> (BillBrowser, FakeBills) {
        let backend = FakeBills::new(Reply::Bills(vec![bill("1", 1), bill("2", 3), bill("3", 1)]));
        let browser = BillBrowser::new(Arc::new(MemoryStorage::new()));
        (browser, backend)
    }

    #[tokio::test]
    async fn network_failure_falls_back_to_fresh_cache() {
        let (mut browser, backend) = seeded();
        browser.navigate("");
        browser.load_list(&backend, t0()).await;
        assert_eq!(browser.list().view().total_count, 3);

        backend.set(Reply::Down);
        browser.navigate("category=real_estate");
        browser.load_list(&backend, t0() + Duration::hours(2)).await;

        let err = browser.list().error().unwrap();
        assert_eq!(err.kind, ErrorKind::Cache);
        assert_eq!(err.cached_at, Some(t0()));
        let nos: Vec<_> = browser
            .list()
            .view()
            .items
            .iter()
            .map(|b| b.bill_no.as_str())
            .collect();
        assert_eq!(nos, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn expired_cache_is_a_plain_network_error() {
        let (mut browser, backend) = seeded();
        browser.navigate("");
        browser.load_list(&backend, t0()).await;

        backend.set(Reply::Down);
        browser.navigate("order_by=bill_nm");
        browser.load_list(&backend, t0() + Duration::hours(7)).await;

        let err = browser.list().error().unwrap();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(browser.list().view().items.is_empty());
    }

    #[tokio::test]
    async fn filtered_fetch_is_not_cached() {
        let backend = FakeBills::new(Reply::Bills(vec![bill("1", 1), bill("2", 3)]));
        let mut browser = BillBrowser::new(Arc::new(MemoryStorage::new()));
        browser.navigate("category=finance");
        browser.load_list(&backend, t0()).await;

        backend.set(Reply::Down);
        browser.navigate("");
        browser.load_list(&backend, t0()).await;
        assert_eq!(browser.list().error().unwrap().kind, ErrorKind::Network);
    }

    #[tokio::test]
    async fn server_error_ignores_cache() {
        let (mut browser, backend) = seeded();
        browser.navigate("");
        browser.load_list(&backend, t0()).await;

        backend.set(Reply::Broken);
        browser.navigate("order_by=bill_nm");
        browser.load_list(&backend, t0()).await;

        let err = browser.list().error().unwrap();
        assert_eq!(err.kind, ErrorKind::General);
        assert_eq!(err.message, "데이터베이스 오류");
    }

    #[tokio::test]
    async fn open_bill_builds_presentation() {
        let (mut browser, backend) = seeded();
        let update = browser.open_bill("2200001");
        assert_eq!(update, UrlUpdate::push("bill_no=2200001".into()));
        browser.load_detail(&backend).await;

        let bill = browser.detail().record().unwrap();
        assert_eq!(bill.prom_no.as_deref(), Some("제00123호"));
        assert_eq!(bill.major_changes, vec!["전세 보증 확대", "청년 우대"]);
        assert_eq!(bill.category_name, "부동산");

        browser.close_bill();
        assert!(browser.detail().record().is_none());
    }

    #[tokio::test]
    async fn failed_detail_waits_for_retry() {
        let (mut browser, backend) = seeded();
        backend.set(Reply::Down);
        browser.open_bill("2200001");
        browser.load_detail(&backend).await;
        assert_eq!(browser.detail().error().unwrap().kind, ErrorKind::Network);

        backend.set(Reply::Bills(Vec::new()));
        browser.load_detail(&backend).await;
        assert!(browser.detail().record().is_none());

        browser.retry_detail(&backend).await;
        assert!(browser.detail().error().is_none());
        assert_eq!(browser.detail().record().unwrap().detail.bill_no, "2200001");
    }
}
