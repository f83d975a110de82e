use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated store/account entity. One tenant represents a whole
/// connected Shopify store, not an individual user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub shopify_store_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Profile update body for `PUT /tenant/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

/// Body for `PUT /tenant/shopify-credentials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCredentialsUpdate {
    pub shopify_access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_api_key: Option<String>,
}

/// Row counts and revenue for the connected store, from `GET /tenant/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    #[serde(default)]
    pub customers: u64,
    #[serde(default)]
    pub products: u64,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_parses_backend_shape() {
        let json = r#"{
            "id": "t-42",
            "name": "Acme Outfitters",
            "email": "owner@acme.example",
            "shopifyStoreUrl": "https://acme.myshopify.com",
            "isActive": true,
            "createdAt": "2025-11-02T09:30:00Z",
            "updatedAt": "2026-01-15T17:05:00Z"
        }"#;

        let tenant: Tenant = serde_json::from_str(json).expect("tenant should parse");
        assert_eq!(tenant.name, "Acme Outfitters");
        assert_eq!(
            tenant.shopify_store_url.as_deref(),
            Some("https://acme.myshopify.com")
        );
        assert!(tenant.is_active);
        assert!(tenant.created_at.is_some());
    }

    #[test]
    fn tenant_tolerates_minimal_payload() {
        // The verify endpoint may return a trimmed tenant record.
        let tenant: Tenant =
            serde_json::from_str(r#"{"name": "Y Store", "email": "x@y.com"}"#).unwrap();
        assert!(tenant.id.is_none());
        assert!(tenant.is_active);
    }

    #[test]
    fn stats_parse_camel_case_revenue() {
        let stats: TenantStats = serde_json::from_str(
            r#"{"customers": 1247, "products": 89, "orders": 3892, "totalRevenue": 187459.50}"#,
        )
        .unwrap();
        assert_eq!(stats.orders, 3892);
        assert!((stats.total_revenue - 187_459.50).abs() < f64::EPSILON);
    }
}
