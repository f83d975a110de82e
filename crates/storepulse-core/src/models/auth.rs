use serde::{Deserialize, Serialize};

use super::Tenant;

/// Credentials for `POST /auth/login`. The backend identifies a tenant by the
/// email + store URL pair; there is no password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub shopify_store_url: String,
}

/// Signup details for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub shopify_store_url: String,
    pub shopify_access_token: String,
}

/// Successful login/register payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AuthResponse {
    pub token: String,
    pub tenant: Tenant,
}

/// Successful `GET /auth/verify` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub tenant: Tenant,
}
