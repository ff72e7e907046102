use std::fmt::Write;

use sales_dashboard_core::models::filter::FilterField;
use sales_dashboard_core::models::sale::{ChartPoint, SaleRecord};
use sales_dashboard_core::models::sort::{SortConfig, SortKey};
use sales_dashboard_core::SalesDashboard;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Customer Info")]
    customer: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Total Price")]
    price: String,
}

impl From<&SaleRecord> for TableRow {
    fn from(r: &SaleRecord) -> Self {
        Self {
            date: r.display_date(),
            customer: format!("({}) {}", r.avatar_initial(), r.display_email()),
            phone: r.display_phone().to_string(),
            price: format!("${}", r.display_price()),
        }
    }
}

/// Render the whole dashboard as text.
pub fn render(dashboard: &SalesDashboard) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Sales Dashboard — {} Records", dashboard.record_count());
    if let Some(banner) = dashboard.error_banner() {
        let _ = writeln!(out, "! {banner}");
    }
    if dashboard.is_blocked() {
        let _ = writeln!(out, "! Session blocked: authorization failed.");
    }
    out.push('\n');

    out.push_str(&render_filters(dashboard));
    out.push('\n');
    out.push_str(&render_chart(dashboard.chart_series()));
    out.push('\n');
    out.push_str(&render_table(
        &dashboard.visible_rows(),
        dashboard.sort_config(),
        dashboard.is_loading(),
    ));
    out.push_str(&render_footer(dashboard));
    out
}

fn render_filters(dashboard: &SalesDashboard) -> String {
    let inputs = dashboard.inputs();
    let parts: Vec<String> = FilterField::ALL
        .iter()
        .map(|f| {
            let v = inputs.get(*f);
            format!("{}: {}", f.label(), if v.is_empty() { "-" } else { v })
        })
        .collect();
    format!("Filters  {}\n", parts.join(" | "))
}

/// One-line sparkline plus range and total.
pub fn render_chart(series: &[ChartPoint]) -> String {
    if series.is_empty() {
        return "Revenue  (no data)\n".to_string();
    }

    let max = series.iter().map(|p| p.total_sale).fold(f64::MIN, f64::max);
    let min = series.iter().map(|p| p.total_sale).fold(f64::MAX, f64::min);
    let span = max - min;
    let spark: String = series
        .iter()
        .map(|p| {
            let level = if span > 0.0 {
                ((p.total_sale - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                SPARK_LEVELS.len() / 2
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect();
    let total: f64 = series.iter().map(|p| p.total_sale).sum();

    let first = &series[0].day;
    let last = &series[series.len() - 1].day;
    format!("Revenue  {spark}\n         {first} … {last}  min ${min:.2}  max ${max:.2}  total ${total:.2}\n")
}

pub fn render_table(rows: &[SaleRecord], sort: SortConfig, loading: bool) -> String {
    if rows.is_empty() {
        let hint = if loading {
            "Loading data..."
        } else {
            "Try adjusting your search or filters."
        };
        return format!("No sales found. {hint}\n");
    }

    let mut table = Table::new(rows.iter().map(TableRow::from));
    table.with(Style::rounded());
    format!(
        "Sort: date {}  price {}\n{}\n",
        sort.indicator(SortKey::Date),
        sort.indicator(SortKey::Price),
        table
    )
}

fn render_footer(dashboard: &SalesDashboard) -> String {
    let prev = if dashboard.can_go_prev() { "[prev]" } else { " prev " };
    let next = if dashboard.can_go_next() { "[next]" } else { " next " };
    format!("{prev}  {}  {next}\n", dashboard.footer_summary())
}
