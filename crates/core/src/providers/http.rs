use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::SalesProvider;
use crate::errors::DashboardError;
use crate::models::auth::AuthToken;
use crate::models::filter::QueryParams;
use crate::models::settings::Settings;

/// Header carrying the session token on sales requests.
pub const TOKEN_HEADER: &str = "X-AUTOBIZZ-TOKEN";

/// HTTP client for the sales API.
///
/// - **Auth**: `POST {base}/getAuthorize` with `{"tokenType": ...}` → `{"token": ...}`
/// - **Sales**: `GET {base}/sales?startDate=..&endDate=..&priceMin=..&email=..&phone=..&after|before=..`
pub struct HttpSalesProvider {
    client: Client,
    auth_url: String,
    sales_url: String,
    token_type: String,
}

impl HttpSalesProvider {
    pub fn new(settings: &Settings) -> Result<Self, DashboardError> {
        settings.validate()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        Ok(Self {
            client: builder.build()?,
            auth_url: settings.auth_url(),
            sales_url: settings.sales_url(),
            token_type: settings.token_type.clone(),
        })
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn sales_url(&self) -> &str {
        &self.sales_url
    }
}

// ── API request/response types ──────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    token_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SalesProvider for HttpSalesProvider {
    fn name(&self) -> &str {
        "HttpSalesProvider"
    }

    async fn fetch_token(&self) -> Result<AuthToken, DashboardError> {
        let resp = self
            .client
            .post(&self.auth_url)
            .json(&TokenRequest {
                token_type: &self.token_type,
            })
            .send()
            .await
            .map_err(|e| DashboardError::Auth(DashboardError::from(e).to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Auth(format!(
                "token endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| DashboardError::Auth(format!("Failed to parse token response: {e}")))?;

        if body.token.is_empty() {
            return Err(DashboardError::Auth("token endpoint returned an empty token".into()));
        }
        Ok(AuthToken::new(body.token))
    }

    async fn fetch_page(
        &self,
        token: &AuthToken,
        params: &QueryParams,
    ) -> Result<Value, DashboardError> {
        let query = params.to_query_pairs();
        debug!(cursor = ?params.cursor_type, params = query.len(), "requesting sales page");

        let resp = self
            .client
            .get(&self.sales_url)
            .header(TOKEN_HEADER, token.as_str())
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Api {
                endpoint: self.sales_url.clone(),
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        resp.json::<Value>().await.map_err(|e| DashboardError::Api {
            endpoint: self.sales_url.clone(),
            status: status.as_u16(),
            message: format!("Failed to parse sales response: {e}"),
        })
    }
}
