use std::cmp::Ordering;

use crate::models::sale::SaleRecord;
use crate::models::sort::{SortConfig, SortDirection, SortKey};

/// Client-side ordering of the currently loaded page.
///
/// Only touches the rows already fetched; cursors and pagination are never
/// affected. Rows whose sort value is missing or unparsable always go last,
/// in their original relative order.
pub struct SortService;

impl SortService {
    pub fn new() -> Self {
        Self
    }

    /// Return a sorted copy of `rows`. `config.key == None` keeps API order.
    pub fn sort(&self, rows: &[SaleRecord], config: &SortConfig) -> Vec<SaleRecord> {
        let mut sorted = rows.to_vec();
        if let Some(key) = config.key {
            self.sort_in_place(&mut sorted, key, config.direction);
        }
        sorted
    }

    pub fn sort_in_place(&self, rows: &mut [SaleRecord], key: SortKey, direction: SortDirection) {
        match key {
            SortKey::Price => rows.sort_by(|a, b| {
                compare_present(a.price, b.price, direction, |x, y| x.total_cmp(y))
            }),
            SortKey::Date => rows.sort_by(|a, b| {
                compare_present(a.parsed_date(), b.parsed_date(), direction, |x, y| x.cmp(y))
            }),
        }
    }
}

impl Default for SortService {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two optional values in `direction`, placing `None` after every `Some`.
fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => cmp(&x, &y),
            SortDirection::Desc => cmp(&y, &x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
