use serde::{Deserialize, Serialize};

/// Period-over-period growth percentages reported with the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct GrowthRates {
    #[serde(default)]
    pub customers: f64,
    #[serde(default)]
    pub orders: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub avg_order_value: f64,
}

/// `GET /insights/summary` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct InsightsSummary {
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub growth: GrowthRates,
}

/// One bucket of `GET /insights/orders-by-date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersByDatePoint {
    pub date: String,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub revenue: f64,
}

/// One row of `GET /insights/top-customers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    #[serde(default)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub period_spend: f64,
    #[serde(default)]
    pub period_order_count: u64,
    #[serde(default)]
    pub avg_order_value: f64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub orders_count: u64,
}

impl TopCustomer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One row of `GET /insights/product-performance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sold_quantity: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub inventory_quantity: i64,
}

/// One bucket of `GET /insights/revenue-trends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueTrendPoint {
    pub date: String,
    #[serde(default)]
    pub revenue: f64,
}

/// One bucket of `GET /insights/customer-acquisition`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAcquisitionPoint {
    pub period: String,
    #[serde(default)]
    pub new_customers: u64,
}

// ----------------------------------------------------------------------------
// Query parameters
// ----------------------------------------------------------------------------

/// Date-bucketed range query (`orders-by-date`, `revenue-trends`).
/// Dates are `YYYY-MM-DD`; `group_by` is `day`, `week`, or `month`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DateRangeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl DateRangeQuery {
    /// Daily buckets covering the trailing `days` window ending today.
    pub fn last_days(days: i64, today: chrono::NaiveDate) -> Self {
        let start = today - chrono::Duration::days(days);
        Self {
            start_date: Some(start.format("%Y-%m-%d").to_string()),
            end_date: Some(today.format("%Y-%m-%d").to_string()),
            group_by: Some("day".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TopCustomersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPerformanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AcquisitionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}
