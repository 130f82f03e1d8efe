//! Period analytics over an in-memory order snapshot.
//!
//! Every function here is pure: it reads the orders it is given and returns
//! a fresh value. Revenue and average ticket only ever look at completed
//! orders, while the order count covers the whole window.

use crate::types::{
    Order, OrderStatus, PeriodComparison, PeriodMetrics, PeriodWindow, ProductRanking,
    SeriesPoint, StatusOverview,
};
use crate::util::{days_in_month, month_label};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_PRODUCTS: usize = 5;

fn completed_in<'a>(
    orders: &'a [Order],
    window: PeriodWindow,
) -> impl Iterator<Item = &'a Order> + 'a {
    orders
        .iter()
        .filter(move |o| o.is_completed() && window.contains(&o.delivery_date))
}

/// Revenue, order count and average ticket for one window.
pub fn compute_metrics(orders: &[Order], window: PeriodWindow) -> PeriodMetrics {
    let mut count = 0usize;
    let mut completed = 0usize;
    let mut revenue = 0.0;
    for o in orders.iter().filter(|o| window.contains(&o.delivery_date)) {
        count += 1;
        if o.is_completed() {
            completed += 1;
            revenue += o.total_value;
        }
    }
    let avg_ticket = if completed > 0 {
        revenue / completed as f64
    } else {
        0.0
    };
    PeriodMetrics {
        revenue,
        count,
        avg_ticket,
    }
}

/// The comparable window right before `window`. `All` has none, and
/// neither has a month outside 1..=12.
pub fn prior_window(window: PeriodWindow) -> Option<PeriodWindow> {
    match window {
        PeriodWindow::Month { year, month: 1 } => Some(PeriodWindow::Month {
            year: year - 1,
            month: 12,
        }),
        PeriodWindow::Month { month, .. } if !(2..=12).contains(&month) => None,
        PeriodWindow::Month { year, month } => Some(PeriodWindow::Month {
            year,
            month: month - 1,
        }),
        PeriodWindow::Year(year) => Some(PeriodWindow::Year(year - 1)),
        PeriodWindow::All => None,
    }
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline yields 100 when anything happened and 0 otherwise.
pub fn growth(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Current metrics against the prior window's, with growth for each.
pub fn compare_to_prior(orders: &[Order], window: PeriodWindow) -> Option<PeriodComparison> {
    let prior = prior_window(window)?;
    let current = compute_metrics(orders, window);
    let previous = compute_metrics(orders, prior);
    Some(PeriodComparison {
        current,
        previous,
        revenue_growth: growth(current.revenue, previous.revenue),
        count_growth: growth(current.count as f64, previous.count as f64),
        avg_ticket_growth: growth(current.avg_ticket, previous.avg_ticket),
    })
}

/// Completed revenue bucketed by day, month or year depending on the window.
///
/// The series has no gaps: buckets without activity carry zero revenue.
/// For `All` the buckets span the minimum to the maximum delivery year of
/// the whole collection.
pub fn build_series(orders: &[Order], window: PeriodWindow) -> Vec<SeriesPoint> {
    match window {
        PeriodWindow::Month { year, month } => {
            let days = days_in_month(year, month);
            let mut buckets = vec![0.0; days as usize];
            for o in completed_in(orders, window) {
                let day = o.delivery_date.day0() as usize;
                if let Some(slot) = buckets.get_mut(day) {
                    *slot += o.total_value;
                }
            }
            buckets
                .into_iter()
                .enumerate()
                .map(|(i, revenue)| SeriesPoint {
                    label: (i + 1).to_string(),
                    revenue,
                })
                .collect()
        }
        PeriodWindow::Year(_) => {
            let mut buckets = [0.0; 12];
            for o in completed_in(orders, window) {
                buckets[o.delivery_date.month0() as usize] += o.total_value;
            }
            buckets
                .into_iter()
                .enumerate()
                .map(|(i, revenue)| SeriesPoint {
                    label: month_label(i as u32 + 1),
                    revenue,
                })
                .collect()
        }
        PeriodWindow::All => {
            let years = orders.iter().map(|o| o.delivery_date.year());
            let (Some(min), Some(max)) = (years.clone().min(), years.max()) else {
                return Vec::new();
            };
            let mut buckets = vec![0.0; (max - min + 1) as usize];
            for o in completed_in(orders, window) {
                buckets[(o.delivery_date.year() - min) as usize] += o.total_value;
            }
            (min..=max)
                .zip(buckets)
                .map(|(year, revenue)| SeriesPoint {
                    label: year.to_string(),
                    revenue,
                })
                .collect()
        }
    }
}

/// Best-selling products of the window by revenue, at most `limit` entries.
///
/// Only itemized completed orders take part. Products keep the name of the
/// first line item seen for them, and equal revenues keep first-seen order.
pub fn top_products(orders: &[Order], window: PeriodWindow, limit: usize) -> Vec<ProductRanking> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranking: Vec<ProductRanking> = Vec::new();
    for o in completed_in(orders, window) {
        let Some(items) = &o.items else {
            continue;
        };
        for item in items {
            let slot = *index.entry(item.product_id.as_str()).or_insert_with(|| {
                ranking.push(ProductRanking {
                    product_id: item.product_id.clone(),
                    name: item.product_name.clone(),
                    quantity: 0.0,
                    revenue: 0.0,
                });
                ranking.len() - 1
            });
            let entry = &mut ranking[slot];
            entry.quantity += item.quantity;
            entry.revenue += item.quantity * item.unit_price;
        }
    }
    ranking.sort_by(|a, b| ranking_key(b).total_cmp(&ranking_key(a)));
    ranking.truncate(limit);
    ranking
}

// NaN revenue sorts below every real amount.
fn ranking_key(p: &ProductRanking) -> f64 {
    if p.revenue.is_nan() {
        f64::NEG_INFINITY
    } else {
        p.revenue
    }
}

/// Distinct delivery years plus `today`'s year, newest first.
pub fn available_years(orders: &[Order], today: NaiveDate) -> Vec<i32> {
    let mut years: BTreeSet<i32> = orders.iter().map(|o| o.delivery_date.year()).collect();
    years.insert(today.year());
    years.into_iter().rev().collect()
}

/// The month of the latest delivery, or `today`'s month without orders.
pub fn default_month(orders: &[Order], today: NaiveDate) -> PeriodWindow {
    let latest = orders
        .iter()
        .map(|o| o.delivery_date.date())
        .max()
        .unwrap_or(today);
    PeriodWindow::Month {
        year: latest.year(),
        month: latest.month(),
    }
}

/// Status counts and completed revenue over the whole collection.
pub fn status_overview(orders: &[Order]) -> StatusOverview {
    let mut overview = StatusOverview {
        total: orders.len(),
        ..StatusOverview::default()
    };
    for o in orders {
        match o.status {
            OrderStatus::Pending => overview.pending += 1,
            OrderStatus::Completed => {
                overview.completed += 1;
                overview.revenue += o.total_value;
            }
            OrderStatus::Canceled => overview.canceled += 1,
        }
    }
    overview
}
