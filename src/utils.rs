//! Shared parsing helpers for the rain gauge monitor
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Parse a station report timestamp as it appears in the portal's info blobs.
///
/// The portal emits either "01/01/2024 10:00 UTC" or "01/01/2024 10:00";
/// both are day-first and both are treated as UTC.
///
/// # Examples
///
/// ```
/// use raingauge_monitor::utils::parse_report_date;
///
/// assert!(parse_report_date("01/01/2024 10:00 UTC").is_some());
/// assert!(parse_report_date("01/01/2024 10:00").is_some());
/// assert!(parse_report_date("yesterday").is_none());
/// ```
pub fn parse_report_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for fmt in ["%d/%m/%Y %H:%M UTC", "%d/%m/%Y %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

/// Extract the first signed decimal number from a free-text value.
///
/// Readings in the info blob carry units and stray text ("1.2 mm",
/// "12.8 V approx"). Only the leading numeric portion is wanted.
///
/// # Examples
///
/// ```
/// use raingauge_monitor::utils::extract_decimal;
///
/// assert_eq!(extract_decimal("1.2 mm"), Some(1.2));
/// assert_eq!(extract_decimal("-3 C"), Some(-3.0));
/// assert_eq!(extract_decimal("none"), None);
/// ```
pub fn extract_decimal(value: &str) -> Option<f64> {
    let re = Regex::new(r"([+-]?\d+(?:\.\d+)?)").unwrap();
    re.captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
