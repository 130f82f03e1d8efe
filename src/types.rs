use crate::error::ReportError;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// An order as stored in the JSON document export (camelCase keys).
///
/// Every field is optional here; `loader` decides which gaps are fatal for
/// the row and which get a default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_id: Option<i64>,
    pub product_summary: Option<String>,
    pub total_value: Option<f64>,
    pub delivery_date: Option<String>,
    pub status: Option<String>,
    pub items: Option<Vec<RawOrderItem>>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderItem {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

/// A row of the flat CSV order export. Line items are not part of it.
#[derive(Debug, Deserialize)]
pub struct RawCsvRow {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "productSummary")]
    pub product_summary: Option<String>,
    #[serde(rename = "totalValue")]
    pub total_value: Option<String>,
    #[serde(rename = "deliveryDate")]
    pub delivery_date: Option<String>,
    #[serde(rename = "status")]
    pub status: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Canceled,
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// A cleaned order. `delivery_date` is the local wall-clock time used for
/// every period and bucket decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_id: Option<i64>,
    pub product_summary: String,
    pub total_value: f64,
    pub delivery_date: NaiveDateTime,
    pub status: OrderStatus,
    pub items: Option<Vec<OrderItem>>,
    pub payment_method: Option<String>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

/// The reporting period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodWindow {
    /// A calendar month; `month` is 1-based.
    Month { year: i32, month: u32 },
    Year(i32),
    All,
}

impl PeriodWindow {
    /// Whether a local timestamp falls inside this window.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        match *self {
            PeriodWindow::Month { year, month } => ts.year() == year && ts.month() == month,
            PeriodWindow::Year(year) => ts.year() == year,
            PeriodWindow::All => true,
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodWindow::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            PeriodWindow::Year(year) => write!(f, "{:04}", year),
            PeriodWindow::All => write!(f, "all"),
        }
    }
}

impl FromStr for PeriodWindow {
    type Err = ReportError;

    /// Accepts `YYYY-MM`, `YYYY` or `all`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ReportError::InvalidPeriod(s.to_string());
        if s.eq_ignore_ascii_case("all") {
            return Ok(PeriodWindow::All);
        }
        match s.split_once('-') {
            Some((y, m)) => {
                let year = y.parse::<i32>().map_err(|_| invalid())?;
                let month = m.parse::<u32>().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(PeriodWindow::Month { year, month })
            }
            None => s.parse::<i32>().map(PeriodWindow::Year).map_err(|_| invalid()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodMetrics {
    /// Sum of totals over completed orders.
    pub revenue: f64,
    /// Every order in the window, whatever its status.
    pub count: usize,
    /// Revenue per completed order; 0 when none completed.
    pub avg_ticket: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current: PeriodMetrics,
    pub previous: PeriodMetrics,
    pub revenue_growth: f64,
    pub count_growth: f64,
    pub avg_ticket_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRanking {
    pub product_id: String,
    pub name: String,
    pub quantity: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub revenue: f64,
}

/// Whole-collection status counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusOverview {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub canceled: usize,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Current")]
    #[tabled(rename = "Current")]
    pub current: String,
    #[serde(rename = "Previous")]
    #[tabled(rename = "Previous")]
    pub previous: String,
    #[serde(rename = "Growth")]
    #[tabled(rename = "Growth")]
    pub growth: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Bucket")]
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProductRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "ProductId")]
    #[tabled(rename = "ProductId")]
    pub product_id: String,
    #[serde(rename = "Product")]
    #[tabled(rename = "Product")]
    pub product: String,
    #[serde(rename = "Quantity")]
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
}

#[derive(Debug, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub metrics: PeriodMetrics,
    pub comparison: Option<PeriodComparison>,
    pub overview: StatusOverview,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_window_parses_all_three_forms() {
        assert_eq!(
            "2024-01".parse::<PeriodWindow>().unwrap(),
            PeriodWindow::Month { year: 2024, month: 1 }
        );
        assert_eq!("2023".parse::<PeriodWindow>().unwrap(), PeriodWindow::Year(2023));
        assert_eq!("ALL".parse::<PeriodWindow>().unwrap(), PeriodWindow::All);
    }

    #[test]
    fn period_window_rejects_bad_month() {
        assert!("2024-13".parse::<PeriodWindow>().is_err());
        assert!("2024-00".parse::<PeriodWindow>().is_err());
        assert!("last-month".parse::<PeriodWindow>().is_err());
    }

    #[test]
    fn period_window_display_matches_parse_input() {
        assert_eq!(PeriodWindow::Month { year: 2024, month: 3 }.to_string(), "2024-03");
        assert_eq!(PeriodWindow::Year(2024).to_string(), "2024");
        assert_eq!(PeriodWindow::All.to_string(), "all");
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("Completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Canceled));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
