//! Scans a scraped map page for `SetMap(...)` marker calls and turns each
//! one into a [`StationRecord`].

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::fleet_status::FleetStatusTable;
use crate::setmap::info::parse_info_html;
use crate::setmap::literal::{coerce_token, Value};
use crate::setmap::tokenizer::tokenize_args;
use crate::status::{classify, reconcile, StationStatus};

/// One station as parsed from a marker call, enriched with info-blob
/// fields and a reconciled status.
///
/// The first fifteen fields mirror the call's positional argument order;
/// anything past the argument count stays `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StationRecord {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
    pub icon_config: Option<Value>,
    pub marker_type: Option<Value>,
    pub image_path: Option<Value>,
    pub name: Option<Value>,
    pub info_html: Option<Value>,
    pub icon_filename: Option<Value>,
    pub code: Option<Value>,
    pub radar_radius: Option<Value>,
    pub label_lat: Option<Value>,
    pub label_lon: Option<Value>,
    pub radar_type: Option<Value>,
    pub radar_name: Option<Value>,
    pub radar_address: Option<Value>,

    // Extracted from the info blob
    pub rain: Option<String>,
    pub date: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub battery_v: Option<f64>,
    pub solar_volt_v: Option<f64>,
    pub status_text: Option<String>,

    // Derived
    pub status_from_icon: StationStatus,
    pub station_code: Option<String>,
    pub status: StationStatus,
}

impl StationRecord {
    fn from_positional(values: &[Value]) -> Self {
        let field = |idx: usize| values.get(idx).cloned();
        StationRecord {
            lat: field(0),
            lon: field(1),
            icon_config: field(2),
            marker_type: field(3),
            image_path: field(4),
            name: field(5),
            info_html: field(6),
            icon_filename: field(7),
            code: field(8),
            radar_radius: field(9),
            label_lat: field(10),
            label_lon: field(11),
            radar_type: field(12),
            radar_name: field(13),
            radar_address: field(14),
            ..StationRecord::default()
        }
    }

    /// Fill in the derived fields: icon status guess, info-blob fields,
    /// station-code alias, final reconciled status.
    ///
    /// When an info blob is present its `code` field replaces the
    /// positional one, even when the blob has no `Code:` line.
    fn enrich(&mut self, fleet: Option<&FleetStatusTable>, now: DateTime<Utc>) {
        self.status_from_icon = self
            .icon_filename
            .as_ref()
            .map(|v| classify::from_icon(&v.render()))
            .unwrap_or_default();

        let blob = self
            .info_html
            .as_ref()
            .and_then(Value::as_text)
            .map(str::to_string);
        if let Some(blob) = blob {
            if !blob.trim().is_empty() {
                let info = parse_info_html(&blob);
                self.code = info.code.map(Value::Text);
                self.rain = info.rain;
                self.date = info.date;
                self.temperature_c = info.temperature_c;
                self.humidity_pct = info.humidity_pct;
                self.battery_v = info.battery_v;
                self.solar_volt_v = info.solar_volt_v;
                self.status_text = info.status_text;
            }
        }

        self.station_code = self.code.as_ref().map(Value::render);
        self.status = reconcile::determine_final_status(self, fleet, now);
    }
}

/// Extract every marker call from the page text.
///
/// Each `SetMap(` occurrence is closed by balancing parentheses, so nested
/// parens inside argument strings do not cut the call short. Calls with
/// empty argument lists are skipped outright, and the first matched call
/// is discarded as a header row when its first value is "lat"
/// (case-insensitive).
#[instrument(skip(html, fleet), fields(html_size = html.len()))]
pub fn extract_stations(
    html: &str,
    fleet: Option<&FleetStatusTable>,
    now: DateTime<Utc>,
) -> Vec<StationRecord> {
    let call_pattern = Regex::new(r"SetMap\s*\(").unwrap();
    let bytes = html.as_bytes();
    let mut stations = Vec::new();
    let mut call_index = 0usize;

    for m in call_pattern.find_iter(html) {
        let start = m.end();
        let mut i = start;
        let mut depth = 1u32;
        while i < bytes.len() && depth > 0 {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            i += 1;
        }

        // `i` sits one past the closing paren, or at end of text when the
        // call is unbalanced; either way the last byte is dropped.
        let mut end = i.saturating_sub(1).max(start);
        while end > start && !html.is_char_boundary(end) {
            end -= 1;
        }
        let inner = html[start..end].trim();
        if inner.is_empty() {
            continue;
        }

        let values: Vec<Value> = tokenize_args(inner)
            .iter()
            .map(|token| coerce_token(token))
            .collect();

        if call_index == 0
            && values
                .first()
                .is_some_and(|v| v.render().eq_ignore_ascii_case("lat"))
        {
            debug!("skipping first marker call (header labels)");
            call_index += 1;
            continue;
        }

        let mut record = StationRecord::from_positional(&values);
        record.enrich(fleet, now);
        stations.push(record);
        call_index += 1;
    }

    debug!("extracted {} station records", stations.len());
    stations
}
