use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

pub const DEFAULT_BASE_URL: &str = "https://autobizz-425913.uc.r.appspot.com";

/// Dashboard configuration. Any field missing from a JSON document takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API root, without trailing slash (e.g. "https://example.com").
    pub base_url: String,

    /// Path of the token endpoint (POST).
    pub auth_path: String,

    /// Path of the sales query endpoint (GET).
    pub sales_path: String,

    /// Value sent as `tokenType` when requesting a token.
    pub token_type: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Maximum number of pages kept in the result cache.
    pub cache_capacity: usize,

    /// Maximum number of table rows shown per page.
    pub page_display_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_path: "/getAuthorize".to_string(),
            sales_path: "/sales".to_string(),
            token_type: "frontEndTest".to_string(),
            timeout_secs: 30,
            cache_capacity: 64,
            page_display_limit: 50,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(DashboardError::InvalidConfig("base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(DashboardError::InvalidConfig(format!(
                "base_url '{base}' must start with http:// or https://"
            )));
        }
        if self.cache_capacity == 0 {
            return Err(DashboardError::InvalidConfig(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if self.page_display_limit == 0 {
            return Err(DashboardError::InvalidConfig(
                "page_display_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn auth_url(&self) -> String {
        join_url(&self.base_url, &self.auth_path)
    }

    pub fn sales_url(&self) -> String {
        join_url(&self.base_url, &self.sales_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}
