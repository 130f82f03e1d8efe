//! Order reporting for a small-business order book.
//!
//! `analytics` holds the period calculations (metrics, prior-period
//! comparison, revenue series, product rankings). `loader` turns a JSON or
//! CSV order snapshot into clean [`Order`]s, and `reports`/`output` render
//! the results as tables, CSV and JSON.

pub mod analytics;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use analytics::{
    available_years, build_series, compare_to_prior, compute_metrics, default_month, growth,
    prior_window, status_overview, top_products, DEFAULT_TOP_PRODUCTS,
};
pub use error::{ReportError, Result};
pub use types::{
    Order, OrderItem, OrderStatus, PeriodComparison, PeriodMetrics, PeriodWindow, ProductRanking,
    SeriesPoint, StatusOverview,
};
