//! Typed HTTP client for the fundbook API.
//!
//! The session cookie set by `login` is kept in the client's cookie store and
//! sent with every following request. GET responses are cached in a
//! [`QueryCache`] until a mutation touches the same resource.

use api_types::{
    DateRangeQuery, ErrorBody,
    auth::{LoginRequest, UserView},
    category::{CategoryNew, CategoryUpdate, CategoryView},
    cost::{CostListQuery, CostNew, CostUpdate, CostView},
    dashboard::{ActivityQuery, ActivityView, DashboardStatsView},
    distribution::{
        FundMovementQuery, ManualDistributionNew, ManualDistributionUpdate, ManualDistributionView,
    },
    fund::{FundListQuery, FundNew, FundUpdate, FundView, UnallocatedView},
    nomenclature::{NomenclatureListQuery, NomenclatureNew, NomenclatureUpdate, NomenclatureView},
    receipt::{ReceiptDetailView, ReceiptListQuery, ReceiptNew, ReceiptUpdate, ReceiptView},
    report::{ExpenseReportView, FundBalanceReportView, SponsorReportView},
    sponsor::{SponsorNew, SponsorUpdate, SponsorView},
    transfer::{FundTransferNew, FundTransferUpdate, FundTransferView},
};
use reqwest::{Method, Request, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

pub use cache::QueryCache;
pub use error::{ClientError, Result};

mod cache;
mod error;

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    cache: QueryCache,
}

impl Client {
    /// `base_url` points at the api root, e.g. `http://127.0.0.1:3000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url,
            http,
            cache: QueryCache::new(),
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::BaseUrl(err.to_string()))
    }

    fn cache_key(&self, url: &Url) -> String {
        let path = url
            .path()
            .strip_prefix(self.base_url.path())
            .unwrap_or(url.path());
        match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        }
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let res = self.http.execute(request).await?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::debug!(%status, "request failed: {body}");
        Err(ClientError::from_status(status, body))
    }

    async fn fetch_request<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let key = self.cache_key(request.url());
        if let Some(value) = self.cache.get(&key) {
            tracing::trace!(key = %key, "cache hit");
            return Ok(serde_json::from_value(value)?);
        }

        let res = self.execute(request).await?;
        let value = res.json::<Value>().await?;
        self.cache.insert(key, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.endpoint(path)?).build()?;
        self.fetch_request(request).await
    }

    async fn fetch_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let request = self.http.get(self.endpoint(path)?).query(query).build()?;
        self.fetch_request(request).await
    }

    async fn mutate<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self
            .http
            .request(method, self.endpoint(path)?)
            .json(body)
            .build()?;
        let res = self.execute(request).await?;
        self.cache.invalidate(path);
        Ok(res.json::<T>().await?)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let request = self.http.delete(self.endpoint(path)?).build()?;
        self.execute(request).await?;
        self.cache.invalidate(path);
        Ok(())
    }

    // Auth

    pub async fn login(&self, username: &str, password: &str) -> Result<UserView> {
        let payload = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self
            .http
            .post(self.endpoint("auth/login")?)
            .json(&payload)
            .build()?;
        let res = self.execute(request).await?;
        self.cache.clear();
        Ok(res.json::<UserView>().await?)
    }

    pub async fn logout(&self) -> Result<()> {
        let request = self.http.post(self.endpoint("auth/logout")?).build()?;
        self.execute(request).await?;
        self.cache.clear();
        Ok(())
    }

    /// Current user. Never cached, so it doubles as a session check.
    pub async fn me(&self) -> Result<UserView> {
        let request = self.http.get(self.endpoint("auth/me")?).build()?;
        let res = self.execute(request).await?;
        Ok(res.json::<UserView>().await?)
    }

    // Sponsors

    pub async fn sponsors(&self) -> Result<Vec<SponsorView>> {
        self.fetch("sponsors").await
    }

    pub async fn sponsor(&self, id: Uuid) -> Result<SponsorView> {
        self.fetch(&format!("sponsors/{id}")).await
    }

    pub async fn create_sponsor(&self, payload: &SponsorNew) -> Result<SponsorView> {
        self.mutate(Method::POST, "sponsors", payload).await
    }

    pub async fn update_sponsor(&self, id: Uuid, payload: &SponsorUpdate) -> Result<SponsorView> {
        self.mutate(Method::PATCH, &format!("sponsors/{id}"), payload)
            .await
    }

    pub async fn delete_sponsor(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("sponsors/{id}")).await
    }

    // Funds

    pub async fn funds(&self, query: &FundListQuery) -> Result<Vec<FundView>> {
        self.fetch_with("funds", query).await
    }

    pub async fn fund(&self, id: Uuid) -> Result<FundView> {
        self.fetch(&format!("funds/{id}")).await
    }

    pub async fn create_fund(&self, payload: &FundNew) -> Result<FundView> {
        self.mutate(Method::POST, "funds", payload).await
    }

    pub async fn update_fund(&self, id: Uuid, payload: &FundUpdate) -> Result<FundView> {
        self.mutate(Method::PATCH, &format!("funds/{id}"), payload)
            .await
    }

    pub async fn delete_fund(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("funds/{id}")).await
    }

    /// Use [`UnallocatedView::can_distribute`] to gate manual distributions.
    pub async fn unallocated(&self) -> Result<UnallocatedView> {
        self.fetch("funds/unallocated").await
    }

    // Receipts

    pub async fn receipts(&self, query: &ReceiptListQuery) -> Result<Vec<ReceiptView>> {
        self.fetch_with("receipts", query).await
    }

    pub async fn receipt(&self, id: Uuid) -> Result<ReceiptDetailView> {
        self.fetch(&format!("receipts/{id}")).await
    }

    pub async fn create_receipt(&self, payload: &ReceiptNew) -> Result<ReceiptDetailView> {
        self.mutate(Method::POST, "receipts", payload).await
    }

    pub async fn update_receipt(
        &self,
        id: Uuid,
        payload: &ReceiptUpdate,
    ) -> Result<ReceiptDetailView> {
        self.mutate(Method::PATCH, &format!("receipts/{id}"), payload)
            .await
    }

    pub async fn delete_receipt(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("receipts/{id}")).await
    }

    // Costs

    pub async fn costs(&self, query: &CostListQuery) -> Result<Vec<CostView>> {
        self.fetch_with("costs", query).await
    }

    pub async fn cost(&self, id: Uuid) -> Result<CostView> {
        self.fetch(&format!("costs/{id}")).await
    }

    pub async fn create_cost(&self, payload: &CostNew) -> Result<CostView> {
        self.mutate(Method::POST, "costs", payload).await
    }

    pub async fn update_cost(&self, id: Uuid, payload: &CostUpdate) -> Result<CostView> {
        self.mutate(Method::PATCH, &format!("costs/{id}"), payload)
            .await
    }

    pub async fn delete_cost(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("costs/{id}")).await
    }

    // Expense categories

    pub async fn categories(&self) -> Result<Vec<CategoryView>> {
        self.fetch("categories").await
    }

    pub async fn category(&self, id: Uuid) -> Result<CategoryView> {
        self.fetch(&format!("categories/{id}")).await
    }

    pub async fn create_category(&self, payload: &CategoryNew) -> Result<CategoryView> {
        self.mutate(Method::POST, "categories", payload).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &CategoryUpdate,
    ) -> Result<CategoryView> {
        self.mutate(Method::PATCH, &format!("categories/{id}"), payload)
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("categories/{id}")).await
    }

    // Nomenclature

    pub async fn nomenclature(
        &self,
        query: &NomenclatureListQuery,
    ) -> Result<Vec<NomenclatureView>> {
        self.fetch_with("nomenclature", query).await
    }

    pub async fn nomenclature_item(&self, id: Uuid) -> Result<NomenclatureView> {
        self.fetch(&format!("nomenclature/{id}")).await
    }

    pub async fn create_nomenclature(&self, payload: &NomenclatureNew) -> Result<NomenclatureView> {
        self.mutate(Method::POST, "nomenclature", payload).await
    }

    pub async fn update_nomenclature(
        &self,
        id: Uuid,
        payload: &NomenclatureUpdate,
    ) -> Result<NomenclatureView> {
        self.mutate(Method::PATCH, &format!("nomenclature/{id}"), payload)
            .await
    }

    pub async fn delete_nomenclature(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("nomenclature/{id}")).await
    }

    // Manual fund distributions

    pub async fn manual_distributions(
        &self,
        query: &FundMovementQuery,
    ) -> Result<Vec<ManualDistributionView>> {
        self.fetch_with("manual-fund-distributions", query).await
    }

    pub async fn manual_distribution(&self, id: Uuid) -> Result<ManualDistributionView> {
        self.fetch(&format!("manual-fund-distributions/{id}")).await
    }

    pub async fn create_manual_distribution(
        &self,
        payload: &ManualDistributionNew,
    ) -> Result<ManualDistributionView> {
        self.mutate(Method::POST, "manual-fund-distributions", payload)
            .await
    }

    pub async fn update_manual_distribution(
        &self,
        id: Uuid,
        payload: &ManualDistributionUpdate,
    ) -> Result<ManualDistributionView> {
        self.mutate(
            Method::PATCH,
            &format!("manual-fund-distributions/{id}"),
            payload,
        )
        .await
    }

    pub async fn delete_manual_distribution(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("manual-fund-distributions/{id}"))
            .await
    }

    // Fund transfers

    pub async fn fund_transfers(&self, query: &FundMovementQuery) -> Result<Vec<FundTransferView>> {
        self.fetch_with("fund-transfers", query).await
    }

    pub async fn fund_transfer(&self, id: Uuid) -> Result<FundTransferView> {
        self.fetch(&format!("fund-transfers/{id}")).await
    }

    pub async fn create_fund_transfer(&self, payload: &FundTransferNew) -> Result<FundTransferView> {
        self.mutate(Method::POST, "fund-transfers", payload).await
    }

    pub async fn update_fund_transfer(
        &self,
        id: Uuid,
        payload: &FundTransferUpdate,
    ) -> Result<FundTransferView> {
        self.mutate(Method::PATCH, &format!("fund-transfers/{id}"), payload)
            .await
    }

    pub async fn delete_fund_transfer(&self, id: Uuid) -> Result<()> {
        self.remove(&format!("fund-transfers/{id}")).await
    }

    // Reports and dashboard

    pub async fn expense_report(&self, range: &DateRangeQuery) -> Result<ExpenseReportView> {
        self.fetch_with("reports/expenses", range).await
    }

    pub async fn sponsor_report(&self, range: &DateRangeQuery) -> Result<SponsorReportView> {
        self.fetch_with("reports/sponsors", range).await
    }

    pub async fn fund_balance_report(
        &self,
        range: &DateRangeQuery,
    ) -> Result<FundBalanceReportView> {
        self.fetch_with("reports/fund-balance", range).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStatsView> {
        self.fetch("dashboard/stats").await
    }

    pub async fn recent_activity(&self, limit: Option<u64>) -> Result<Vec<ActivityView>> {
        self.fetch_with("dashboard/activity", &ActivityQuery { limit })
            .await
    }
}
