use tracing::{debug, error, warn};

use crate::errors::DashboardError;
use crate::models::auth::AuthToken;
use crate::models::cache::ResultCache;
use crate::models::filter::QueryParams;
use crate::models::sale::SalesResult;
use crate::providers::traits::SalesProvider;
use crate::services::normalizer;

/// Fetches sales pages through a `SalesProvider`, with memoization.
///
/// Cache strategy:
/// - A page is identified by its full `QueryParams` (filters + cursor).
/// - A repeated identical query is answered from `ResultCache` without a
///   network call.
/// - The cache is bounded (LRU) and cleared by the caller when a different
///   filter is applied.
pub struct SalesService {
    provider: Box<dyn SalesProvider>,
    cache: ResultCache,
    network_requests: u64,
}

impl SalesService {
    pub fn new(provider: Box<dyn SalesProvider>, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: ResultCache::new(cache_capacity),
            network_requests: 0,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request a session token. Any failure is reported as `DashboardError::Auth`.
    pub async fn fetch_token(&self) -> Result<AuthToken, DashboardError> {
        match self.provider.fetch_token().await {
            Ok(token) => {
                debug!(provider = self.provider.name(), "session token acquired");
                Ok(token)
            }
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "authorization failed");
                Err(match e {
                    DashboardError::Auth(_) => e,
                    other => DashboardError::Auth(other.to_string()),
                })
            }
        }
    }

    /// Fetch and normalize one page.
    ///
    /// Without a token this is a no-op returning `Ok(None)`: no request is
    /// made and nothing is cached.
    pub async fn fetch_page(
        &mut self,
        token: Option<&AuthToken>,
        params: &QueryParams,
    ) -> Result<Option<SalesResult>, DashboardError> {
        let Some(token) = token else {
            debug!("no session token; skipping sales query");
            return Ok(None);
        };

        if let Some(cached) = self.cache.get(params) {
            debug!(cursor = ?params.cursor_type, "sales page served from cache");
            return Ok(Some(cached.clone()));
        }

        self.network_requests += 1;
        let body = self
            .provider
            .fetch_page(token, params)
            .await
            .inspect_err(|e| warn!(provider = self.provider.name(), error = %e, "sales query failed"))?;

        let result = normalizer::normalize(&body);
        debug!(
            rows = result.table_rows.len(),
            points = result.chart_series.len(),
            has_next = result.pagination.next.is_some(),
            "sales page fetched"
        );
        self.cache.insert(params, result.clone());
        Ok(Some(result))
    }

    /// Forget every cached page.
    pub fn invalidate_cache(&mut self) {
        if !self.cache.is_empty() {
            debug!(entries = self.cache.len(), "result cache invalidated");
        }
        self.cache.clear();
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Number of page requests that actually reached the provider.
    pub fn network_requests(&self) -> u64 {
        self.network_requests
    }
}
