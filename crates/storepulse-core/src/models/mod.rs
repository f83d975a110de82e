//! Domain and wire models mirrored from the storepulse backend.
//!
//! Field names follow the backend's camelCase JSON; everything here is
//! `serde` round-trippable so responses can be cached verbatim.

pub mod auth;
pub mod ingestion;
pub mod insights;
pub mod tenant;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, VerifyResponse};
pub use ingestion::{EntityStatus, IngestionStatus, OrderStatusFilter, SyncEntity, SyncResponse, SyncResults};
pub use insights::{
    AcquisitionQuery, CustomerAcquisitionPoint, DateRangeQuery, GrowthRates, InsightsSummary,
    OrdersByDatePoint, ProductPerformance, ProductPerformanceQuery, RevenueTrendPoint, TopCustomer,
    TopCustomersQuery,
};
pub use tenant::{ProfileUpdate, ShopifyCredentialsUpdate, Tenant, TenantStats};
