//! Final normalization: numeric rain value, ISO timestamp, and
//! per-station-code deduplication.

use std::collections::HashMap;

use serde::Serialize;

use crate::setmap::{StationRecord, Value};
use crate::utils::{extract_decimal, parse_report_date};

/// The exported shape: a station record plus a millimeter rain value and
/// an ISO-8601 report timestamp. At most one exists per station code.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub record: StationRecord,
    pub rain_mm: Option<f64>,
    pub date_iso: Option<String>,
}

impl NormalizedRecord {
    pub fn station_code(&self) -> &str {
        self.record.station_code.as_deref().unwrap_or("")
    }
}

/// Collapse repeated observations of the same station code into the most
/// recently dated one.
///
/// Records without a resolvable code are dropped. A record replaces the
/// stored one for its code only when both report timestamps parse and the
/// new one is strictly later; otherwise the first-seen record stays.
/// Output preserves first-seen code order.
pub fn dedupe_latest(records: Vec<StationRecord>) -> Vec<NormalizedRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut by_code: HashMap<String, NormalizedRecord> = HashMap::new();

    for mut record in records {
        let code = record
            .code
            .as_ref()
            .map(Value::render)
            .or_else(|| record.station_code.clone())
            .unwrap_or_default()
            .trim()
            .to_string();
        if code.is_empty() {
            continue;
        }

        let parsed_date = record.date.as_deref().and_then(parse_report_date);
        record.station_code = Some(code.clone());
        let normalized = NormalizedRecord {
            rain_mm: record.rain.as_deref().and_then(extract_decimal),
            date_iso: parsed_date.map(|dt| dt.to_rfc3339()),
            record,
        };

        match by_code.get(&code) {
            None => {
                order.push(code.clone());
                by_code.insert(code, normalized);
            }
            Some(existing) => {
                let existing_date = existing
                    .record
                    .date
                    .as_deref()
                    .and_then(parse_report_date);
                if let (Some(new_dt), Some(old_dt)) = (parsed_date, existing_date) {
                    if old_dt < new_dt {
                        by_code.insert(code, normalized);
                    }
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|code| by_code.remove(&code))
        .collect()
}
