//! API client for the storepulse analytics backend.
//!
//! Every request carries the bearer token from the session store when one is
//! present. Response handling is centralized: 401 raises the typed
//! session-invalidated signal (the session controller owns the cascade),
//! 403 and 5xx emit their standard notifications, and every failure is
//! normalized to an [`ApiError`] carrying the backend's error payload.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::{
    AcquisitionQuery, AuthResponse, CustomerAcquisitionPoint, DateRangeQuery, IngestionStatus,
    InsightsSummary, LoginRequest, OrderStatusFilter, OrdersByDatePoint, ProductPerformance,
    ProductPerformanceQuery, ProfileUpdate, RegisterRequest, RevenueTrendPoint,
    ShopifyCredentialsUpdate, SyncEntity, SyncResponse, Tenant, TenantStats, TopCustomer,
    TopCustomersQuery, VerifyResponse,
};
use crate::notify::{Notifier, SessionSink};

use super::ApiError;

/// Authentication seam consumed by the session controller, so tests can drive
/// the state machine against a scripted backend.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        credentials: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn register(
        &self,
        details: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn verify(&self) -> impl Future<Output = Result<VerifyResponse, ApiError>> + Send;
}

/// Summary + charts + top customers, fetched together for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub summary: InsightsSummary,
    pub orders_by_date: Vec<OrdersByDatePoint>,
    pub top_customers: Vec<TopCustomer>,
}

/// API client for the storepulse backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn SessionSink>,
}

impl ApiClient {
    /// Create a new API client against the configured base address.
    pub fn new(
        config: &Config,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn SessionSink>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url().trim_end_matches('/').to_string(),
            store,
            notifier,
            sink,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.store.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidResponse(format!("Invalid token: {}", e)))?,
            );
        }
        Ok(headers)
    }

    /// Classify a response, performing the cross-cutting side effects for
    /// session-ending and non-fatal error classes before propagating.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);

        match &err {
            ApiError::Unauthorized => {
                warn!("Received 401, invalidating session");
                self.sink.session_invalidated();
            }
            ApiError::AccessDenied(_) => {
                self.notifier
                    .error("Access denied. You don't have permission for this action.");
            }
            ApiError::ServerError(_) => {
                self.notifier.error("Server error. Please try again later.");
            }
            // Validation and other client errors are the caller's to present
            _ => {}
        }

        Err(err)
    }

    async fn parse<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = self.check(response).await?;
        Self::parse(path, response).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await?;
        let response = self.check(response).await?;
        Self::parse(path, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = self.check(response).await?;
        Self::parse(path, response).await
    }

    /// POST with query parameters and no body (the ingestion triggers).
    async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await?;
        let response = self.check(response).await?;
        Self::parse(path, response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = self.check(response).await?;
        Self::parse(path, response).await
    }

    // ===== Authentication =====

    /// Exchange credentials for a token + tenant. Persistence of the returned
    /// session is the session controller's responsibility, not this layer's.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    pub async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", details).await
    }

    /// Validate the stored token and fetch the fresh tenant record.
    pub async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        self.get("/auth/verify").await
    }

    // ===== Tenant =====

    pub async fn tenant_profile(&self) -> Result<Tenant, ApiError> {
        let envelope: TenantEnvelope = self.get("/tenant/profile").await?;
        Ok(envelope.tenant)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Tenant, ApiError> {
        let envelope: TenantEnvelope = self.put("/tenant/profile", update).await?;
        Ok(envelope.tenant)
    }

    pub async fn update_shopify_credentials(
        &self,
        update: &ShopifyCredentialsUpdate,
    ) -> Result<(), ApiError> {
        let _ack: Ack = self.put("/tenant/shopify-credentials", update).await?;
        Ok(())
    }

    pub async fn tenant_stats(&self) -> Result<TenantStats, ApiError> {
        self.get("/tenant/stats").await
    }

    // ===== Ingestion =====

    /// Trigger a customers or products sync. Orders take an extra status
    /// filter and go through [`ApiClient::sync_orders`].
    pub async fn sync_entity(
        &self,
        entity: SyncEntity,
        full_sync: bool,
    ) -> Result<SyncResponse, ApiError> {
        let path = format!("/ingestion/{}", entity.path_segment());
        self.post_query(&path, &[("full_sync", full_sync.to_string())])
            .await
    }

    pub async fn sync_customers(&self, full_sync: bool) -> Result<SyncResponse, ApiError> {
        self.sync_entity(SyncEntity::Customers, full_sync).await
    }

    pub async fn sync_products(&self, full_sync: bool) -> Result<SyncResponse, ApiError> {
        self.sync_entity(SyncEntity::Products, full_sync).await
    }

    pub async fn sync_orders(
        &self,
        full_sync: bool,
        status: OrderStatusFilter,
    ) -> Result<SyncResponse, ApiError> {
        self.post_query(
            "/ingestion/orders",
            &[
                ("full_sync", full_sync.to_string()),
                ("status", status.as_str().to_string()),
            ],
        )
        .await
    }

    /// Complete re-sync of all entity groups.
    pub async fn full_sync(&self) -> Result<SyncResponse, ApiError> {
        self.post_query("/ingestion/full-sync", &[]).await
    }

    pub async fn ingestion_status(&self) -> Result<IngestionStatus, ApiError> {
        let envelope: StatusEnvelope = self.get("/ingestion/status").await?;
        Ok(envelope.status)
    }

    // ===== Insights =====

    pub async fn insights_summary(&self) -> Result<InsightsSummary, ApiError> {
        let envelope: SummaryEnvelope = self.get("/insights/summary").await?;
        Ok(envelope.summary)
    }

    pub async fn orders_by_date(
        &self,
        query: &DateRangeQuery,
    ) -> Result<Vec<OrdersByDatePoint>, ApiError> {
        let envelope: DataEnvelope<OrdersByDatePoint> =
            self.get_query("/insights/orders-by-date", query).await?;
        Ok(envelope.data)
    }

    pub async fn top_customers(
        &self,
        query: &TopCustomersQuery,
    ) -> Result<Vec<TopCustomer>, ApiError> {
        let envelope: TopCustomersEnvelope =
            self.get_query("/insights/top-customers", query).await?;
        Ok(envelope.top_customers)
    }

    pub async fn product_performance(
        &self,
        query: &ProductPerformanceQuery,
    ) -> Result<Vec<ProductPerformance>, ApiError> {
        let envelope: ProductsEnvelope =
            self.get_query("/insights/product-performance", query).await?;
        Ok(envelope.products)
    }

    pub async fn revenue_trends(
        &self,
        query: &DateRangeQuery,
    ) -> Result<Vec<RevenueTrendPoint>, ApiError> {
        let envelope: DataEnvelope<RevenueTrendPoint> =
            self.get_query("/insights/revenue-trends", query).await?;
        Ok(envelope.data)
    }

    pub async fn customer_acquisition(
        &self,
        query: &AcquisitionQuery,
    ) -> Result<Vec<CustomerAcquisitionPoint>, ApiError> {
        let envelope: DataEnvelope<CustomerAcquisitionPoint> =
            self.get_query("/insights/customer-acquisition", query).await?;
        Ok(envelope.data)
    }

    /// Fetch everything the dashboard renders in one concurrent round.
    pub async fn dashboard(
        &self,
        range: &DateRangeQuery,
        customers: &TopCustomersQuery,
    ) -> Result<DashboardSnapshot, ApiError> {
        let (summary, orders_by_date, top_customers) = futures::try_join!(
            self.insights_summary(),
            self.orders_by_date(range),
            self.top_customers(customers),
        )?;

        Ok(DashboardSnapshot {
            summary,
            orders_by_date,
            top_customers,
        })
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::login(self, credentials).await
    }

    async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::register(self, details).await
    }

    async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        ApiClient::verify(self).await
    }
}

// Internal envelope types for endpoints that wrap their payload

#[derive(Debug, Deserialize)]
struct TenantEnvelope {
    tenant: Tenant,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: IngestionStatus,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    summary: InsightsSummary,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TopCustomersEnvelope {
    #[serde(rename = "topCustomers", default)]
    top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<ProductPerformance>,
}

#[derive(Debug, Default, Deserialize)]
struct Ack {
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_top_customers_key() {
        let json = r#"{"topCustomers": [{"firstName": "Sarah", "lastName": "Johnson"}]}"#;
        let envelope: TopCustomersEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.top_customers.len(), 1);
    }

    #[test]
    fn data_envelope_defaults_to_empty() {
        let envelope: DataEnvelope<OrdersByDatePoint> = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_empty());
    }
}
