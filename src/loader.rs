use crate::error::Result;
use crate::types::{Order, OrderItem, RawCsvRow, RawOrder, RawOrderItem};
use crate::util::{parse_f64_safe, parse_i64_safe, parse_status_safe, parse_timestamp_safe};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub itemized_orders: usize,
}

/// JSON snapshots come either as a bare array or as the stored user document.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderDocument {
    Bare(Vec<serde_json::Value>),
    Wrapped { orders: Vec<serde_json::Value> },
}

/// Load an order snapshot from disk. A `.csv` extension selects the flat
/// export format, anything else is read as JSON.
pub fn load_orders(path: &Path) -> Result<(Vec<Order>, LoadReport)> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let file = BufReader::new(File::open(path)?);
    let (orders, report) = if is_csv {
        load_csv(file)?
    } else {
        load_json(file)?
    };
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        errors = report.parse_errors,
        "order snapshot loaded"
    );
    Ok((orders, report))
}

pub fn load_json<R: Read>(reader: R) -> Result<(Vec<Order>, LoadReport)> {
    let values = match serde_json::from_reader(reader)? {
        OrderDocument::Bare(v) => v,
        OrderDocument::Wrapped { orders } => orders,
    };
    let mut report = LoadReport::default();
    let mut orders = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        report.total_rows += 1;
        let raw: RawOrder = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx, error = %e, "skipping malformed order");
                report.parse_errors += 1;
                continue;
            }
        };
        push_clean(raw, idx, &mut orders, &mut report);
    }
    Ok((orders, report))
}

/// Load the flat CSV export. Rows carry no line items, so they never take
/// part in product rankings.
pub fn load_csv<R: Read>(reader: R) -> Result<(Vec<Order>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut orders = Vec::new();
    for (idx, result) in rdr.deserialize::<RawCsvRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx, error = %e, "skipping unreadable CSV row");
                report.parse_errors += 1;
                continue;
            }
        };
        let raw = RawOrder {
            id: row.id,
            customer_name: row.customer_name,
            customer_id: parse_i64_safe(row.customer_id.as_deref()),
            product_summary: row.product_summary,
            total_value: parse_f64_safe(row.total_value.as_deref()),
            delivery_date: row.delivery_date,
            status: row.status,
            items: None,
            payment_method: row.payment_method.filter(|s| !s.trim().is_empty()),
        };
        push_clean(raw, idx, &mut orders, &mut report);
    }
    Ok((orders, report))
}

fn push_clean(raw: RawOrder, idx: usize, orders: &mut Vec<Order>, report: &mut LoadReport) {
    match clean_order(raw) {
        Some(order) => {
            if order.items.is_some() {
                report.itemized_orders += 1;
            }
            report.loaded_rows += 1;
            orders.push(order);
        }
        None => {
            debug!(row = idx, "order rejected: bad date, total or status");
            report.parse_errors += 1;
        }
    }
}

/// Turn a raw order into a clean one. Orders without a usable delivery
/// date, total or status are rejected here so analytics never sees them.
fn clean_order(raw: RawOrder) -> Option<Order> {
    let delivery_date = parse_timestamp_safe(raw.delivery_date.as_deref())?;
    let total_value = raw.total_value.filter(|v| v.is_finite())?;
    let status = parse_status_safe(raw.status.as_deref())?;
    let items = raw
        .items
        .map(|items| items.into_iter().filter_map(clean_item).collect());

    Some(Order {
        id: raw.id.unwrap_or_default().trim().to_string(),
        customer_name: raw
            .customer_name
            .unwrap_or_else(|| "Unknown".to_string())
            .trim()
            .to_string(),
        customer_id: raw.customer_id,
        product_summary: raw.product_summary.unwrap_or_default(),
        total_value,
        delivery_date,
        status,
        items,
        payment_method: raw.payment_method,
    })
}

fn clean_item(raw: RawOrderItem) -> Option<OrderItem> {
    let product_id = raw.product_id.filter(|s| !s.trim().is_empty())?;
    Some(OrderItem {
        product_name: raw.product_name.unwrap_or_else(|| product_id.clone()),
        product_id,
        quantity: raw.quantity.unwrap_or(0.0),
        unit_price: raw.unit_price.unwrap_or(0.0),
    })
}
