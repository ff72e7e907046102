pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    auth::AuthToken,
    filter::{FilterCriteria, FilterField, QueryParams},
    pagination::{PagePhase, PaginationTracker},
    sale::{ChartPoint, PageCursors, SaleRecord, SalesResult},
    settings::Settings,
    sort::{SortConfig, SortKey},
};
use providers::{http::HttpSalesProvider, traits::SalesProvider};
use services::{sales_service::SalesService, sort_service::SortService};
use tracing::{debug, info};

use errors::DashboardError;

/// Banner text shown after a failed sales query.
pub const FETCH_ERROR_BANNER: &str =
    "There was an error fetching the sales data. Please check your connection or try again.";

/// Banner text shown after a failed authorization.
pub const AUTH_ERROR_BANNER: &str = "Failed to authorize.";

/// Session authorization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No token requested yet.
    Pending,
    /// Token acquired; valid for the rest of the session.
    Ready(AuthToken),
    /// Token request failed; every query is blocked.
    Failed(String),
}

/// Main entry point for the sales dashboard core library.
///
/// Holds all session state in one place — filter inputs, the active query and
/// its history, sort config, the last successful page and the error banner —
/// and is its only writer. Every operation that talks to the API takes
/// `&mut self`, so requests for one dashboard never overlap.
#[must_use]
pub struct SalesDashboard {
    settings: Settings,
    sales_service: SalesService,
    sort_service: SortService,
    auth: AuthState,
    /// Filter values being edited; not applied until `apply_filters`.
    inputs: FilterCriteria,
    tracker: PaginationTracker,
    sort: SortConfig,
    /// Last successfully loaded page. Kept on screen when a later fetch fails.
    data: Option<SalesResult>,
    error_banner: Option<String>,
    /// Cleared once the first page has loaded or failed to load.
    awaiting_first_page: bool,
}

impl std::fmt::Debug for SalesDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesDashboard")
            .field("provider", &self.sales_service.provider_name())
            .field("auth", &self.auth)
            .field("active", self.tracker.active())
            .field("history", &self.tracker.history().len())
            .field("sort", &self.sort)
            .field("rows", &self.record_count())
            .field("cached_pages", &self.sales_service.cache().len())
            .finish()
    }
}

impl SalesDashboard {
    /// Create a dashboard over any provider.
    pub fn new(provider: Box<dyn SalesProvider>, settings: Settings) -> Result<Self, DashboardError> {
        settings.validate()?;
        let sales_service = SalesService::new(provider, settings.cache_capacity);
        Ok(Self {
            settings,
            sales_service,
            sort_service: SortService::new(),
            auth: AuthState::Pending,
            inputs: FilterCriteria::default(),
            tracker: PaginationTracker::new(),
            sort: SortConfig::default(),
            data: None,
            error_banner: None,
            awaiting_first_page: true,
        })
    }

    /// Create a dashboard talking to the HTTP API described by `settings`.
    pub fn with_http(settings: Settings) -> Result<Self, DashboardError> {
        let provider = HttpSalesProvider::new(&settings)?;
        Self::new(Box::new(provider), settings)
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Acquire the session token. Runs at most once per session: later calls
    /// return immediately, or `SessionBlocked` if the first attempt failed.
    pub async fn authenticate(&mut self) -> Result<(), DashboardError> {
        match &self.auth {
            AuthState::Ready(_) => return Ok(()),
            AuthState::Failed(_) => return Err(DashboardError::SessionBlocked),
            AuthState::Pending => {}
        }

        match self.sales_service.fetch_token().await {
            Ok(token) => {
                self.auth = AuthState::Ready(token);
                Ok(())
            }
            Err(e) => {
                self.auth = AuthState::Failed(e.to_string());
                self.error_banner = Some(AUTH_ERROR_BANNER.to_string());
                self.awaiting_first_page = false;
                Err(e)
            }
        }
    }

    /// Authenticate and load the first page of the current filters.
    pub async fn start(&mut self) -> Result<(), DashboardError> {
        self.authenticate().await?;
        self.refresh().await
    }

    #[must_use]
    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    /// True once authorization has failed; nothing can be queried any more.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self.auth, AuthState::Failed(_))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, AuthState::Ready(_))
    }

    // ── Filters ─────────────────────────────────────────────────────

    /// Edit one filter input. Takes effect on the next `apply_filters`.
    pub fn set_input(&mut self, field: FilterField, value: impl Into<String>) {
        self.inputs.set(field, value);
    }

    #[must_use]
    pub fn inputs(&self) -> &FilterCriteria {
        &self.inputs
    }

    /// Apply the edited inputs: back to the first page, history cleared.
    /// Cached pages are dropped when the filters actually changed.
    pub async fn apply_filters(&mut self) -> Result<(), DashboardError> {
        self.ensure_session()?;
        let changed = self.tracker.apply_filters(self.inputs.clone());
        if changed {
            info!("filters changed; pagination history reset");
            self.sales_service.invalidate_cache();
        }
        self.refresh().await
    }

    // ── Pagination ──────────────────────────────────────────────────

    /// Follow the `next` cursor of the loaded page.
    ///
    /// Navigation only sticks when the target page loads; on failure the
    /// active query and history are left exactly as they were.
    pub async fn go_next(&mut self) -> Result<(), DashboardError> {
        self.ensure_session()?;
        let next = self.pagination().and_then(|p| p.next.clone());
        let saved = self.tracker.clone();
        self.tracker.go_next(next.as_deref())?;
        self.refresh_or_restore(saved).await
    }

    /// Return to the query that was active before the last `go_next`.
    pub async fn go_prev(&mut self) -> Result<(), DashboardError> {
        self.ensure_session()?;
        let saved = self.tracker.clone();
        self.tracker.go_prev()?;
        self.refresh_or_restore(saved).await
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.pagination().is_some_and(|p| p.next.is_some())
    }

    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        self.tracker.can_go_prev()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.tracker.history().len()
    }

    #[must_use]
    pub fn active_query(&self) -> &QueryParams {
        self.tracker.active()
    }

    #[must_use]
    pub fn page_phase(&self) -> PagePhase {
        self.tracker.phase()
    }

    /// Cursors of the loaded page, if any page has loaded.
    #[must_use]
    pub fn pagination(&self) -> Option<&PageCursors> {
        self.data.as_ref().map(|d| &d.pagination)
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Load the active query (from cache when possible).
    ///
    /// Without a token this does nothing. On failure the previous page stays
    /// loaded and the error banner is set.
    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        self.ensure_session()?;
        let token = match &self.auth {
            AuthState::Ready(token) => Some(token),
            _ => None,
        };

        match self
            .sales_service
            .fetch_page(token, self.tracker.active())
            .await
        {
            Ok(Some(result)) => {
                self.data = Some(result);
                self.error_banner = None;
                self.awaiting_first_page = false;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.error_banner = Some(FETCH_ERROR_BANNER.to_string());
                self.awaiting_first_page = false;
                Err(e)
            }
        }
    }

    /// Number of page requests that reached the provider (cache hits excluded).
    #[must_use]
    pub fn network_requests(&self) -> u64 {
        self.sales_service.network_requests()
    }

    #[must_use]
    pub fn cached_pages(&self) -> usize {
        self.sales_service.cache().len()
    }

    // ── Sorting ─────────────────────────────────────────────────────

    /// Header click on `key`. Local only: never triggers a fetch.
    pub fn toggle_sort(&mut self, key: Option<SortKey>) {
        self.sort = self.sort.toggled(key);
        debug!(key = ?self.sort.key, direction = ?self.sort.direction, "sort changed");
    }

    #[must_use]
    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    /// Rows of the loaded page in display order.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<SaleRecord> {
        match &self.data {
            Some(d) => self.sort_service.sort(&d.table_rows, &self.sort),
            None => Vec::new(),
        }
    }

    /// Sorted rows capped at the configured display limit.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<SaleRecord> {
        let mut rows = self.sorted_rows();
        rows.truncate(self.settings.page_display_limit);
        rows
    }

    // ── Display state ───────────────────────────────────────────────

    #[must_use]
    pub fn chart_series(&self) -> &[ChartPoint] {
        self.data.as_ref().map(|d| d.chart_series.as_slice()).unwrap_or(&[])
    }

    /// The last successfully loaded page.
    #[must_use]
    pub fn current_result(&self) -> Option<&SalesResult> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.table_rows.len())
    }

    /// e.g. "Showing 50 of 120 results".
    #[must_use]
    pub fn footer_summary(&self) -> String {
        let total = self.record_count();
        format!(
            "Showing {} of {} results",
            total.min(self.settings.page_display_limit),
            total
        )
    }

    /// True until the first page has either loaded or failed. A failed
    /// first load stays not-loading after its banner is dismissed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.awaiting_first_page && self.data.is_none()
    }

    #[must_use]
    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    /// Hide the error banner. An auth failure still blocks queries.
    pub fn dismiss_error(&mut self) {
        self.error_banner = None;
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Load the tracker's new active query, putting `saved` back on error.
    async fn refresh_or_restore(&mut self, saved: PaginationTracker) -> Result<(), DashboardError> {
        let result = self.refresh().await;
        if result.is_err() {
            debug!(active = ?saved.active().cursor_token, "page change failed; navigation rolled back");
            self.tracker = saved;
        }
        result
    }

    fn ensure_session(&self) -> Result<(), DashboardError> {
        if self.is_blocked() {
            return Err(DashboardError::SessionBlocked);
        }
        Ok(())
    }
}
