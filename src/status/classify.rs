//! Independent status heuristics. Each classifier is a pure function from
//! one evidence source to a [`StationStatus`]; precedence between sources
//! lives in [`crate::status::reconcile`], not here.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Operational status of a rain-gauge station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatus {
    Online,
    Offline,
    Timeout,
    Disconnect,
    Repair,
    #[default]
    Unknown,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::Online => "ONLINE",
            StationStatus::Offline => "OFFLINE",
            StationStatus::Timeout => "TIMEOUT",
            StationStatus::Disconnect => "DISCONNECT",
            StationStatus::Repair => "REPAIR",
            StationStatus::Unknown => "UNKNOWN",
        }
    }

    /// Map an already-uppercased status word onto a known status.
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "ONLINE" => Some(StationStatus::Online),
            "OFFLINE" => Some(StationStatus::Offline),
            "TIMEOUT" => Some(StationStatus::Timeout),
            "DISCONNECT" => Some(StationStatus::Disconnect),
            "REPAIR" => Some(StationStatus::Repair),
            _ => None,
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify from a marker icon filename or path.
///
/// Generic numbered rain-level icons (`raingauge-12.png`) carry no status
/// signal and are always UNKNOWN. Everything else is matched by keyword,
/// highest-confidence first.
pub fn from_icon(icon: &str) -> StationStatus {
    if icon.is_empty() {
        return StationStatus::Unknown;
    }
    let icon = icon.to_lowercase();

    let rain_level = Regex::new(r"raingauge[_-]\d+(\.png)?").unwrap();
    if rain_level.is_match(&icon) {
        return StationStatus::Unknown;
    }

    if icon.contains("online") || icon.contains("green") || icon.contains("_1") {
        StationStatus::Online
    } else if icon.contains("offline") || icon.contains("red") || icon.contains("_0") {
        StationStatus::Offline
    } else if icon.contains("timeout") || icon.contains("yellow") || icon.contains("orange") {
        StationStatus::Timeout
    } else if icon.contains("disconnect") || icon.contains("grey") || icon.contains("gray") {
        StationStatus::Disconnect
    } else if icon.contains("repair") || icon.contains("maintenance") {
        StationStatus::Repair
    } else {
        StationStatus::Unknown
    }
}

/// Classify from a fleet-table status image's `src` and `alt` attributes.
pub fn from_status_image(src: &str, alt: &str) -> StationStatus {
    if src.is_empty() && alt.is_empty() {
        return StationStatus::Unknown;
    }
    let combined = format!("{src} {alt}").to_lowercase();

    if combined.contains("online") || combined.contains("green") || combined.contains("normal") {
        return StationStatus::Online;
    }
    if combined.contains("offline") || combined.contains("red") {
        return StationStatus::Offline;
    }
    if combined.contains("timeout") || combined.contains("yellow") || combined.contains("warning") {
        return StationStatus::Timeout;
    }
    if combined.contains("disconnect") || combined.contains("grey") || combined.contains("gray") {
        return StationStatus::Disconnect;
    }
    if combined.contains("repair") || combined.contains("maintenance") {
        return StationStatus::Repair;
    }

    // Last resort: a status-<word> naming convention in the image path
    let pattern = Regex::new(r"status[_-](\w+)").unwrap();
    if let Some(caps) = pattern.captures(&combined) {
        if let Some(status) = StationStatus::from_word(&caps[1].to_uppercase()) {
            return status;
        }
    }

    StationStatus::Unknown
}

/// Result of classifying a free-text probe response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextClassification {
    pub status: StationStatus,
    /// Provenance note when the status was assumed rather than matched.
    pub note: Option<&'static str>,
}

/// Classify a station probe response by keyword search.
///
/// Keyword groups are checked in priority order. A body over 500 bytes
/// with no keyword at all is taken as a live response and assumed ONLINE;
/// the note records that assumption.
pub fn from_response_text(body: &str) -> TextClassification {
    let groups: [(StationStatus, &str); 5] = [
        (StationStatus::Online, r"online|connected|normal|active"),
        (StationStatus::Offline, r"offline|disconnected"),
        (StationStatus::Timeout, r"timeout|warning|delayed"),
        (StationStatus::Disconnect, r"disconnect"),
        (StationStatus::Repair, r"repair|maintenance"),
    ];

    let lower = body.to_lowercase();
    for (status, pattern) in groups {
        if Regex::new(pattern).unwrap().is_match(&lower) {
            return TextClassification { status, note: None };
        }
    }

    if body.len() > 500 {
        return TextClassification {
            status: StationStatus::Online,
            note: Some("Assumed from valid response"),
        };
    }

    TextClassification {
        status: StationStatus::Unknown,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_green_online() {
        assert_eq!(from_icon("icon_green_online.png"), StationStatus::Online);
    }

    #[test]
    fn test_icon_rain_level_is_unknown_regardless_of_keywords() {
        assert_eq!(from_icon("raingauge-12.png"), StationStatus::Unknown);
        assert_eq!(from_icon("green/raingauge_3.png"), StationStatus::Unknown);
    }

    #[test]
    fn test_icon_no_keyword_is_unknown() {
        assert_eq!(from_icon("marker.png"), StationStatus::Unknown);
        assert_eq!(from_icon(""), StationStatus::Unknown);
    }

    #[test]
    fn test_icon_suffix_conventions() {
        assert_eq!(from_icon("station_1.png"), StationStatus::Online);
        assert_eq!(from_icon("station_0.png"), StationStatus::Offline);
    }

    #[test]
    fn test_icon_priority_order() {
        // "online" outranks the grey keyword later in the chain
        assert_eq!(from_icon("grey_online.png"), StationStatus::Online);
        assert_eq!(from_icon("orange_marker.png"), StationStatus::Timeout);
        assert_eq!(from_icon("under_repair.png"), StationStatus::Repair);
    }

    #[test]
    fn test_image_src_and_alt_combined() {
        assert_eq!(
            from_status_image("/img/led_green.gif", ""),
            StationStatus::Online
        );
        assert_eq!(from_status_image("", "warning"), StationStatus::Timeout);
        assert_eq!(from_status_image("", ""), StationStatus::Unknown);
    }

    #[test]
    fn test_image_status_word_fallback() {
        assert_eq!(
            from_status_image("/icons/status-repair.gif", ""),
            StationStatus::Repair
        );
        // Unrecognized status words stay unknown
        assert_eq!(
            from_status_image("/icons/status-broken.gif", ""),
            StationStatus::Unknown
        );
    }

    #[test]
    fn test_response_text_keyword_priority() {
        let result = from_response_text("Station is online and reporting");
        assert_eq!(result.status, StationStatus::Online);
        assert!(result.note.is_none());

        // "disconnected" hits the offline group before the disconnect group
        let result = from_response_text("sensor disconnected");
        assert_eq!(result.status, StationStatus::Offline);
    }

    #[test]
    fn test_response_text_large_body_assumed_online() {
        let body = "x".repeat(501);
        let result = from_response_text(&body);
        assert_eq!(result.status, StationStatus::Online);
        assert_eq!(result.note, Some("Assumed from valid response"));
    }

    #[test]
    fn test_response_text_small_body_unknown() {
        let result = from_response_text("ok");
        assert_eq!(result.status, StationStatus::Unknown);
        assert!(result.note.is_none());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&StationStatus::Online).unwrap();
        assert_eq!(json, "\"ONLINE\"");
    }
}
