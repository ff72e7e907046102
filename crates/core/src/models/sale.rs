use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single data point for the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Day label as sent by the API (e.g. "2024-01-05")
    pub day: String,

    /// Sum of sales on that day
    pub total_sale: f64,
}

impl ChartPoint {
    /// Decode one `TotalSales` entry. `totalSale` may be a number or a numeric string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let day = match obj.get("day")? {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let total_sale = number_like(obj.get("totalSale")?)?;
        Some(Self { day, total_sale })
    }
}

/// One row of the sales table.
///
/// No validation is applied: any field the API left out stays `None` and is
/// shown as a placeholder. The original JSON is kept in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub price: Option<f64>,
    pub raw: Value,
}

impl SaleRecord {
    pub fn from_value(value: Value) -> Self {
        let field = |name: &str| -> Option<String> {
            match value.get(name)? {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        Self {
            id: field("_id").or_else(|| field("id")),
            date: field("date"),
            customer_email: field("customerEmail"),
            customer_phone: field("customerPhone"),
            price: value.get("price").and_then(number_like),
            raw: value,
        }
    }

    /// The record date as a calendar date-time, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_time)
    }

    /// e.g. "Jan 5, 2024"; "Invalid Date" when the date does not parse.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Some(dt) => dt.format("%b %-d, %Y").to_string(),
            None => "Invalid Date".to_string(),
        }
    }

    pub fn display_email(&self) -> &str {
        self.customer_email.as_deref().unwrap_or("Unknown")
    }

    /// Uppercased first letter of the email, or "?".
    pub fn avatar_initial(&self) -> String {
        self.customer_email
            .as_deref()
            .and_then(|e| e.chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn display_phone(&self) -> &str {
        self.customer_phone.as_deref().unwrap_or("N/A")
    }

    /// Two decimals, "0.00" when missing.
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price.unwrap_or(0.0))
    }
}

/// Opaque cursors marking the page boundaries of a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursors {
    /// `pagination.after` — requests the following page
    pub next: Option<String>,
    /// `pagination.before` — exposed for display, not used for navigation
    pub prev: Option<String>,
}

/// Normalized contents of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesResult {
    pub chart_series: Vec<ChartPoint>,
    pub table_rows: Vec<SaleRecord>,
    pub pagination: PageCursors,
}

/// Parse the date formats the API is known to emit: RFC 3339 timestamps,
/// naive ISO date-times and plain dates.
pub fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// A JSON number, or a string holding one.
fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}
