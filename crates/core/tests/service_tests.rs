// ═══════════════════════════════════════════════════════════════════
// Service Tests — SortService ordering, SalesService fetching/caching
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use sales_dashboard_core::errors::DashboardError;
use sales_dashboard_core::models::auth::AuthToken;
use sales_dashboard_core::models::filter::{FilterCriteria, QueryParams};
use sales_dashboard_core::models::sale::SaleRecord;
use sales_dashboard_core::models::sort::{SortConfig, SortDirection, SortKey};
use sales_dashboard_core::providers::traits::SalesProvider;
use sales_dashboard_core::services::sales_service::SalesService;
use sales_dashboard_core::services::sort_service::SortService;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Counts calls and answers every page with a body echoing the cursor.
struct CountingProvider {
    token_calls: Arc<AtomicUsize>,
    page_calls: Arc<AtomicUsize>,
    fail_pages: Arc<AtomicBool>,
    fail_auth: bool,
}

impl CountingProvider {
    fn new() -> Self {
        Self {
            token_calls: Arc::new(AtomicUsize::new(0)),
            page_calls: Arc::new(AtomicUsize::new(0)),
            fail_pages: Arc::new(AtomicBool::new(false)),
            fail_auth: false,
        }
    }
}

#[async_trait]
impl SalesProvider for CountingProvider {
    fn name(&self) -> &str {
        "CountingProvider"
    }

    async fn fetch_token(&self) -> Result<AuthToken, DashboardError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_auth {
            return Err(DashboardError::Network("connection refused".into()));
        }
        Ok(AuthToken::new("tok"))
    }

    async fn fetch_page(
        &self,
        _token: &AuthToken,
        params: &QueryParams,
    ) -> Result<Value, DashboardError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(DashboardError::Api {
                endpoint: "/sales".into(),
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        let cursor = params.cursor_token.clone().unwrap_or_else(|| "first".into());
        Ok(json!({
            "TotalSales": [{ "day": "2024-01-01", "totalSale": 30 }],
            "sales": [
                { "_id": format!("{cursor}-1"), "price": 30 },
                { "_id": format!("{cursor}-2"), "price": 10 }
            ],
            "pagination": { "after": format!("{cursor}+") }
        }))
    }
}

fn rows(prices: &[Option<f64>]) -> Vec<SaleRecord> {
    prices
        .iter()
        .map(|p| match p {
            Some(v) => SaleRecord::from_value(json!({ "price": v })),
            None => SaleRecord::from_value(json!({})),
        })
        .collect()
}

fn prices(rows: &[SaleRecord]) -> Vec<Option<f64>> {
    rows.iter().map(|r| r.price).collect()
}

fn dated(dates: &[&str]) -> Vec<SaleRecord> {
    dates
        .iter()
        .map(|d| SaleRecord::from_value(json!({ "date": d })))
        .collect()
}

fn dates(rows: &[SaleRecord]) -> Vec<String> {
    rows.iter().map(|r| r.date.clone().unwrap_or_default()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// SortService
// ═══════════════════════════════════════════════════════════════════

mod sort_service {
    use super::*;

    fn by(key: SortKey, direction: SortDirection) -> SortConfig {
        SortConfig {
            key: Some(key),
            direction,
        }
    }

    #[test]
    fn price_ascending_then_descending() {
        let svc = SortService::new();
        let input = rows(&[Some(30.0), Some(10.0), Some(20.0)]);

        let mut config = SortConfig::default().toggled(Some(SortKey::Price));
        assert_eq!(
            prices(&svc.sort(&input, &config)),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );

        config = config.toggled(Some(SortKey::Price));
        assert_eq!(
            prices(&svc.sort(&input, &config)),
            vec![Some(30.0), Some(20.0), Some(10.0)]
        );
    }

    #[test]
    fn no_key_keeps_api_order() {
        let svc = SortService::new();
        let input = rows(&[Some(30.0), Some(10.0), Some(20.0)]);
        assert_eq!(
            prices(&svc.sort(&input, &SortConfig::default())),
            vec![Some(30.0), Some(10.0), Some(20.0)]
        );
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let svc = SortService::new();
        let input = rows(&[Some(3.0), Some(1.0)]);
        let _ = svc.sort(&input, &by(SortKey::Price, SortDirection::Asc));
        assert_eq!(prices(&input), vec![Some(3.0), Some(1.0)]);
    }

    #[test]
    fn missing_prices_go_last_in_both_directions() {
        let svc = SortService::new();
        let input = rows(&[None, Some(5.0), Some(1.0)]);
        assert_eq!(
            prices(&svc.sort(&input, &by(SortKey::Price, SortDirection::Asc))),
            vec![Some(1.0), Some(5.0), None]
        );
        assert_eq!(
            prices(&svc.sort(&input, &by(SortKey::Price, SortDirection::Desc))),
            vec![Some(5.0), Some(1.0), None]
        );
    }

    #[test]
    fn dates_sort_chronologically() {
        let svc = SortService::new();
        let input = dated(&["2024-03-01", "2023-12-31T23:59:59Z", "2024-01-15T08:00:00Z"]);
        assert_eq!(
            dates(&svc.sort(&input, &by(SortKey::Date, SortDirection::Asc))),
            vec!["2023-12-31T23:59:59Z", "2024-01-15T08:00:00Z", "2024-03-01"]
        );
        assert_eq!(
            dates(&svc.sort(&input, &by(SortKey::Date, SortDirection::Desc))),
            vec!["2024-03-01", "2024-01-15T08:00:00Z", "2023-12-31T23:59:59Z"]
        );
    }

    #[test]
    fn unparsable_dates_do_not_break_sorting() {
        let svc = SortService::new();
        let input = dated(&["not a date", "2024-02-01", "2024-01-01"]);
        let sorted = dates(&svc.sort(&input, &by(SortKey::Date, SortDirection::Asc)));
        assert_eq!(sorted.len(), 3);
        assert_eq!(&sorted[..2], &["2024-01-01", "2024-02-01"]);
    }

    #[test]
    fn equal_prices_keep_relative_order() {
        let svc = SortService::new();
        let input = vec![
            SaleRecord::from_value(json!({ "_id": "a", "price": 5 })),
            SaleRecord::from_value(json!({ "_id": "b", "price": 5 })),
            SaleRecord::from_value(json!({ "_id": "c", "price": 1 })),
        ];
        let ids: Vec<_> = svc
            .sort(&input, &by(SortKey::Price, SortDirection::Asc))
            .into_iter()
            .map(|r| r.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SalesService — fetching and caching
// ═══════════════════════════════════════════════════════════════════

mod sales_service {
    use super::*;

    fn q(email: &str) -> QueryParams {
        QueryParams::first_page(FilterCriteria {
            email: email.into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn without_token_is_a_no_op() {
        let provider = CountingProvider::new();
        let calls = provider.page_calls.clone();
        let mut svc = SalesService::new(Box::new(provider), 8);

        let result = svc.fetch_page(None, &q("a")).await.unwrap();
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(svc.network_requests(), 0);
        assert!(svc.cache().is_empty());
    }

    #[tokio::test]
    async fn fetches_and_normalizes() {
        let mut svc = SalesService::new(Box::new(CountingProvider::new()), 8);
        let token = AuthToken::new("tok");

        let result = svc.fetch_page(Some(&token), &q("a")).await.unwrap().unwrap();
        assert_eq!(result.table_rows.len(), 2);
        assert_eq!(result.chart_series.len(), 1);
        assert_eq!(result.pagination.next.as_deref(), Some("first+"));
    }

    #[tokio::test]
    async fn identical_query_hits_cache() {
        let provider = CountingProvider::new();
        let calls = provider.page_calls.clone();
        let mut svc = SalesService::new(Box::new(provider), 8);
        let token = AuthToken::new("tok");

        let first = svc.fetch_page(Some(&token), &q("a")).await.unwrap();
        let second = svc.fetch_page(Some(&token), &q("a")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(svc.cache().hits(), 1);
    }

    #[tokio::test]
    async fn different_cursor_is_a_separate_page() {
        let provider = CountingProvider::new();
        let calls = provider.page_calls.clone();
        let mut svc = SalesService::new(Box::new(provider), 8);
        let token = AuthToken::new("tok");

        svc.fetch_page(Some(&token), &q("a")).await.unwrap();
        let next = svc
            .fetch_page(Some(&token), &q("a").after("first+"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(next.table_rows[0].id.as_deref(), Some("first+-1"));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let provider = CountingProvider::new();
        let calls = provider.page_calls.clone();
        let mut svc = SalesService::new(Box::new(provider), 8);
        let token = AuthToken::new("tok");

        svc.fetch_page(Some(&token), &q("a")).await.unwrap();
        svc.invalidate_cache();
        svc.fetch_page(Some(&token), &q("a")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let provider = CountingProvider::new();
        let fail = provider.fail_pages.clone();
        let calls = provider.page_calls.clone();
        let mut svc = SalesService::new(Box::new(provider), 8);
        let token = AuthToken::new("tok");

        fail.store(true, Ordering::SeqCst);
        let err = svc.fetch_page(Some(&token), &q("a")).await.unwrap_err();
        assert!(matches!(err, DashboardError::Api { status: 500, .. }));
        assert!(svc.cache().is_empty());

        fail.store(false, Ordering::SeqCst);
        assert!(svc.fetch_page(Some(&token), &q("a")).await.unwrap().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn token_failure_becomes_auth_error() {
        let mut provider = CountingProvider::new();
        provider.fail_auth = true;
        let calls = provider.token_calls.clone();
        let svc = SalesService::new(Box::new(provider), 8);

        let err = svc.fetch_token().await.unwrap_err();
        assert!(matches!(err, DashboardError::Auth(_)));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_capacity_bounds_entries() {
        let mut svc = SalesService::new(Box::new(CountingProvider::new()), 2);
        let token = AuthToken::new("tok");
        for email in ["a", "b", "c"] {
            svc.fetch_page(Some(&token), &q(email)).await.unwrap();
        }
        assert_eq!(svc.cache().len(), 2);
        assert!(!svc.cache().contains(&q("a")));
    }
}
