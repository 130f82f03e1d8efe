// Utility helpers for parsing, calendar math and number formatting.
//
// This module centralizes the "dirty" timestamp/number handling so the
// analytics code can assume clean, typed values.
use crate::types::OrderStatus;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

pub fn parse_status_safe(s: Option<&str>) -> Option<OrderStatus> {
    s?.parse::<OrderStatus>().ok()
}

/// Parse a delivery timestamp into its local wall-clock representation.
///
/// Timestamps with an explicit offset are converted to the local zone.
/// Naive timestamps and bare dates are taken as already local.
pub fn parse_timestamp_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Number of days in a calendar month, or 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(next) => (next - first).num_days() as u32,
        None => 0,
    }
}

/// Abbreviated month name (`Jan`..`Dec`) for a 1-based month.
pub fn month_label(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Signed percentage with one decimal, e.g. `+12.5%`.
pub fn format_growth(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn days_in_month_follows_calendar() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
    }

    #[test]
    fn month_labels_are_abbreviated() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(9), "Sep");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "");
    }

    #[test]
    fn naive_timestamps_are_kept_as_local() {
        let ts = parse_timestamp_safe(Some("2023-10-28T10:00:00")).unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2023, 10, 28, 10));

        let ts = parse_timestamp_safe(Some("2023-10-28T10:00:00.250")).unwrap();
        assert_eq!(ts.hour(), 10);

        let ts = parse_timestamp_safe(Some(" 2024-02-29 ")).unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (2, 29, 0));
    }

    #[test]
    fn offset_timestamps_parse() {
        assert!(parse_timestamp_safe(Some("2024-01-05T12:00:00Z")).is_some());
        assert!(parse_timestamp_safe(Some("2024-01-05T12:00:00-03:00")).is_some());
    }

    #[test]
    fn offset_timestamps_convert_to_local_wall_clock() {
        // 23:30 at -03:00 is 02:30 UTC on the next day.
        let utc = NaiveDate::from_ymd_opt(2024, 1, 6)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let expected = Local.from_utc_datetime(&utc).naive_local();

        let parsed = parse_timestamp_safe(Some("2024-01-05T23:30:00-03:00")).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.date(), expected.date());

        let zulu = parse_timestamp_safe(Some("2024-01-06T02:30:00Z")).unwrap();
        assert_eq!(zulu, expected);
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        assert!(parse_timestamp_safe(None).is_none());
        assert!(parse_timestamp_safe(Some("")).is_none());
        assert!(parse_timestamp_safe(Some("tomorrow")).is_none());
        assert!(parse_timestamp_safe(Some("2023-02-30")).is_none());
    }

    #[test]
    fn numbers_accept_thousands_separators() {
        assert_eq!(parse_f64_safe(Some("1,500.00")), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("R$ 10")), None);
        assert_eq!(parse_i64_safe(Some(" 42 ")), Some(42));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-50.0, 2), "-50.00");
        assert_eq!(format_number(0.0, 2), "0.00");
        assert_eq!(format_growth(50.0), "+50.0%");
        assert_eq!(format_growth(-12.345), "-12.3%");
        assert_eq!(format_int(9855usize), "9,855");
    }
}
