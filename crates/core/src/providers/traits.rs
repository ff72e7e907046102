use async_trait::async_trait;
use serde_json::Value;

use crate::errors::DashboardError;
use crate::models::auth::AuthToken;
use crate::models::filter::QueryParams;

/// Abstraction over the remote sales API.
///
/// The HTTP implementation talks to the real service; tests substitute
/// in-memory providers. Bodies are returned raw because the API's response
/// shape is not fixed — shaping happens in the normalizer.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SalesProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Obtain a session token.
    async fn fetch_token(&self) -> Result<AuthToken, DashboardError>;

    /// Fetch one page of sales for `params`, returning the raw JSON body.
    async fn fetch_page(
        &self,
        token: &AuthToken,
        params: &QueryParams,
    ) -> Result<Value, DashboardError>;
}
