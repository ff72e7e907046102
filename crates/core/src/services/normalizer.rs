use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::sale::{ChartPoint, PageCursors, SaleRecord, SalesResult};

/// Field holding the chart series.
pub const CHART_KEY: &str = "TotalSales";

/// Field holding the table rows in the documented response shape.
pub const PRIMARY_TABLE_KEY: &str = "sales";

/// Alternative table fields seen from the API, in priority order.
pub const FALLBACK_TABLE_KEYS: [&str; 3] = ["Sales", "orders", "items"];

/// How the table rows were found in a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// The documented `sales` field.
    Primary,
    /// One of the known alternative names.
    KnownFallback(String),
    /// The first array-valued field that is not the chart series.
    FirstArray(String),
    /// No array anywhere; the table is empty.
    Missing,
}

/// Shape a loosely structured sales response into a `SalesResult`.
///
/// Never fails: anything unrecognised degrades to empty data. Every branch
/// other than the documented shape is logged at `warn` so schema drift shows
/// up in the logs.
pub fn normalize(body: &Value) -> SalesResult {
    let data = payload(body);

    let chart_series = match data.and_then(|d| d.get(CHART_KEY)) {
        Some(Value::Array(points)) => {
            let series: Vec<ChartPoint> = points.iter().filter_map(ChartPoint::from_value).collect();
            if series.len() < points.len() {
                warn!(
                    skipped = points.len() - series.len(),
                    "dropped {CHART_KEY} entries without a usable day/totalSale"
                );
            }
            series
        }
        Some(_) => {
            warn!("{CHART_KEY} is not an array; chart left empty");
            Vec::new()
        }
        None => {
            warn!("response has no {CHART_KEY}; chart left empty");
            Vec::new()
        }
    };

    let (source, rows) = match data {
        Some(d) => locate_table(d),
        None => (TableSource::Missing, &[][..]),
    };
    match &source {
        TableSource::Primary => {}
        TableSource::KnownFallback(key) => {
            warn!(key = %key, "sales rows read from fallback field")
        }
        TableSource::FirstArray(key) => {
            warn!(key = %key, "sales rows read from first array field")
        }
        TableSource::Missing => warn!("no array field in response; table left empty"),
    }

    let table_rows = rows.iter().cloned().map(SaleRecord::from_value).collect();

    SalesResult {
        chart_series,
        table_rows,
        pagination: read_cursors(body, data),
    }
}

/// Find the table rows inside a response object.
///
/// Checks `sales`, then the known fallback names, then the first array field
/// (in document order) that is not `TotalSales`.
pub fn locate_table(data: &Map<String, Value>) -> (TableSource, &[Value]) {
    if let Some(rows) = data.get(PRIMARY_TABLE_KEY).and_then(Value::as_array) {
        return (TableSource::Primary, rows);
    }
    for key in FALLBACK_TABLE_KEYS {
        if let Some(rows) = data.get(key).and_then(Value::as_array) {
            return (TableSource::KnownFallback(key.to_string()), rows);
        }
    }
    data.iter()
        .find_map(|(key, value)| match value {
            Value::Array(rows) if key != CHART_KEY => {
                Some((TableSource::FirstArray(key.clone()), rows.as_slice()))
            }
            _ => None,
        })
        .unwrap_or((TableSource::Missing, &[][..]))
}

/// The object holding chart/table data: the `results` envelope when present,
/// otherwise the body itself.
fn payload(body: &Value) -> Option<&Map<String, Value>> {
    if let Some(results) = body.get("results").and_then(Value::as_object) {
        debug!("reading sales data from results envelope");
        return Some(results);
    }
    let obj = body.as_object();
    if obj.is_none() {
        warn!("response body is not an object");
    }
    obj
}

/// `pagination.after` / `pagination.before`, top level first, then inside the envelope.
fn read_cursors(body: &Value, data: Option<&Map<String, Value>>) -> PageCursors {
    let pagination = body
        .get("pagination")
        .or_else(|| data.and_then(|d| d.get("pagination")));

    let cursor = |name: &str| -> Option<String> {
        match pagination?.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    PageCursors {
        next: cursor("after"),
        prev: cursor("before"),
    }
}
