use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::models::filter::{CursorType, FilterCriteria, QueryParams};

/// Where the tracker is in its navigation lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagePhase {
    /// First page of the applied filters, no cursor.
    #[default]
    Idle,
    /// Positioned after a server cursor.
    Forward,
    /// Showing a query restored from history.
    BackwardReplay,
}

/// Active query plus the stack of queries that led to it.
///
/// Backward navigation replays the remembered query verbatim instead of
/// asking the server for a `before` page, so `go_next` then `go_prev` is
/// an exact round trip and the replayed page is served from cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationTracker {
    active: QueryParams,
    history: Vec<QueryParams>,
    phase: PagePhase,
}

impl PaginationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &QueryParams {
        &self.active
    }

    pub fn history(&self) -> &[QueryParams] {
        &self.history
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn can_go_prev(&self) -> bool {
        !self.history.is_empty()
    }

    /// Start over on the first page of `filters`. History is always cleared.
    /// Returns `true` when the filters differ from the previously applied ones.
    pub fn apply_filters(&mut self, filters: FilterCriteria) -> bool {
        let first = QueryParams::first_page(filters);
        let changed = self.active.filters != first.filters;
        self.history.clear();
        self.active = first;
        self.phase = PagePhase::Idle;
        changed
    }

    /// Move past `next_cursor`, remembering the current query.
    pub fn go_next(&mut self, next_cursor: Option<&str>) -> Result<&QueryParams, DashboardError> {
        let cursor = next_cursor
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DashboardError::Validation("No next page cursor available".into()))?;

        let next = self.active.after(cursor);
        let previous = std::mem::replace(&mut self.active, next);
        self.history.push(previous);
        self.phase = PagePhase::Forward;
        Ok(&self.active)
    }

    /// Restore the most recently remembered query exactly as it was.
    pub fn go_prev(&mut self) -> Result<&QueryParams, DashboardError> {
        let previous = self
            .history
            .pop()
            .ok_or_else(|| DashboardError::Validation("No previous page in history".into()))?;

        self.active = previous;
        self.phase = if self.active.cursor_type == CursorType::None && self.history.is_empty() {
            PagePhase::Idle
        } else {
            PagePhase::BackwardReplay
        };
        Ok(&self.active)
    }
}
