use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity groups the ingestion service can synchronize from Shopify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEntity {
    Customers,
    Products,
    Orders,
}

impl SyncEntity {
    /// Path segment used by the `POST /ingestion/{entity}` endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            SyncEntity::Customers => "customers",
            SyncEntity::Products => "products",
            SyncEntity::Orders => "orders",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SyncEntity::Customers => "Customers",
            SyncEntity::Products => "Products",
            SyncEntity::Orders => "Orders",
        }
    }
}

/// Order status filter for order sync. The backend defaults to `any`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatusFilter {
    #[default]
    Any,
    Open,
    Closed,
    Cancelled,
}

impl OrderStatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatusFilter::Any => "any",
            OrderStatusFilter::Open => "open",
            OrderStatusFilter::Closed => "closed",
            OrderStatusFilter::Cancelled => "cancelled",
        }
    }
}

/// Row-level outcome of a sync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncResults {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
}

/// Response from the per-entity and full-sync ingestion endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub results: SyncResults,
    #[serde(default)]
    pub message: Option<String>,
}

/// Last-sync bookkeeping for one entity group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStatus {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
}

/// `GET /ingestion/status` payload, one entry per entity group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionStatus {
    #[serde(default)]
    pub customers: EntityStatus,
    #[serde(default)]
    pub products: EntityStatus,
    #[serde(default)]
    pub orders: EntityStatus,
}

impl IngestionStatus {
    pub fn entity(&self, entity: SyncEntity) -> &EntityStatus {
        match entity {
            SyncEntity::Customers => &self.customers,
            SyncEntity::Products => &self.products,
            SyncEntity::Orders => &self.orders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_response_parses_nested_results() {
        let resp: SyncResponse =
            serde_json::from_str(r#"{"results": {"created": 12, "updated": 340}}"#).unwrap();
        assert_eq!(resp.results.created, 12);
        assert_eq!(resp.results.updated, 340);
        assert!(resp.message.is_none());
    }

    #[test]
    fn status_tolerates_missing_entities() {
        let status: IngestionStatus = serde_json::from_str(
            r#"{"customers": {"count": 1247, "lastSync": "2026-01-10T04:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(status.customers.count, 1247);
        assert!(status.customers.last_sync.is_some());
        assert_eq!(status.entity(SyncEntity::Orders).count, 0);
        assert!(status.orders.last_sync.is_none());
    }
}
