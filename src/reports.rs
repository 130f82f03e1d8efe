use crate::analytics::{build_series, compare_to_prior, compute_metrics, status_overview, top_products};
use crate::types::{
    MetricRow, Order, PeriodComparison, PeriodMetrics, PeriodSummary, PeriodWindow,
    ProductRankingRow, SeriesPoint, SeriesRow,
};
use crate::util::{format_growth, format_int, format_number};

/// Everything rendered for one selected period.
pub struct PeriodReport {
    pub summary: PeriodSummary,
    pub series: Vec<SeriesPoint>,
    pub rankings: Vec<ProductRankingRow>,
}

pub fn generate_period_report(orders: &[Order], window: PeriodWindow, top: usize) -> PeriodReport {
    let summary = PeriodSummary {
        period: window.to_string(),
        metrics: compute_metrics(orders, window),
        comparison: compare_to_prior(orders, window),
        overview: status_overview(orders),
    };
    let rankings = top_products(orders, window, top)
        .into_iter()
        .enumerate()
        .map(|(idx, p)| ProductRankingRow {
            rank: idx + 1,
            product_id: p.product_id,
            product: p.name,
            quantity: format_number(p.quantity, 0),
            revenue: format_number(p.revenue, 2),
        })
        .collect();
    PeriodReport {
        summary,
        series: build_series(orders, window),
        rankings,
    }
}

/// KPI rows; the previous/growth columns stay empty without a prior window.
pub fn metric_rows(metrics: &PeriodMetrics, comparison: Option<&PeriodComparison>) -> Vec<MetricRow> {
    let row = |name: &str, current: String, previous: Option<String>, growth: Option<f64>| MetricRow {
        metric: name.to_string(),
        current,
        previous: previous.unwrap_or_default(),
        growth: growth.map(format_growth).unwrap_or_default(),
    };
    vec![
        row(
            "Revenue",
            format_number(metrics.revenue, 2),
            comparison.map(|c| format_number(c.previous.revenue, 2)),
            comparison.map(|c| c.revenue_growth),
        ),
        row(
            "Orders",
            format_int(metrics.count),
            comparison.map(|c| format_int(c.previous.count)),
            comparison.map(|c| c.count_growth),
        ),
        row(
            "AvgTicket",
            format_number(metrics.avg_ticket, 2),
            comparison.map(|c| format_number(c.previous.avg_ticket, 2)),
            comparison.map(|c| c.avg_ticket_growth),
        ),
    ]
}

pub fn series_rows(series: &[SeriesPoint]) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|p| SeriesRow {
            bucket: p.label.clone(),
            revenue: format_number(p.revenue, 2),
        })
        .collect()
}
