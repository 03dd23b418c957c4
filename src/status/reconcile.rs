//! Merges the independent status heuristics into one final status.
//!
//! Precedence is a fixed, visible policy: fleet-table evidence, then the
//! station's own free-text status field, then the icon guess, then
//! timestamp staleness as the last resort.

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::fleet_status::FleetStatusTable;
use crate::setmap::StationRecord;
use crate::status::StationStatus;
use crate::utils::parse_report_date;

/// Infer status purely from how stale the last report is.
///
/// Within 30 minutes counts as ONLINE, within 6 hours as TIMEOUT, anything
/// older as DISCONNECT. A missing or unparseable report date also means
/// DISCONNECT. `now` is passed in so the policy is deterministic under test.
pub fn status_by_timestamp(report_date: Option<&str>, now: DateTime<Utc>) -> StationStatus {
    let Some(parsed) = report_date.and_then(parse_report_date) else {
        return StationStatus::Disconnect;
    };

    let delay = now - parsed;
    if delay <= Duration::minutes(30) {
        StationStatus::Online
    } else if delay <= Duration::hours(6) {
        StationStatus::Timeout
    } else {
        StationStatus::Disconnect
    }
}

/// Determine the final status for one station record.
///
/// First applicable evidence wins:
/// 1. a non-UNKNOWN fleet-table entry for the station code,
/// 2. a recognizable keyword in the record's own status text,
/// 3. a non-UNKNOWN icon-derived guess,
/// 4. timestamp staleness.
pub fn determine_final_status(
    record: &StationRecord,
    fleet: Option<&FleetStatusTable>,
    now: DateTime<Utc>,
) -> StationStatus {
    if let (Some(table), Some(code)) = (fleet, record.station_code.as_deref()) {
        if let Some(entry) = table.get(code) {
            if entry.status != StationStatus::Unknown {
                trace!(code, status = %entry.status, "status from fleet table");
                return entry.status;
            }
        }
    }

    if let Some(text) = record.status_text.as_deref() {
        let upper = text.to_uppercase();
        if ["ONLINE", "NORMAL", "ACTIVE"].iter().any(|kw| upper.contains(kw)) {
            return StationStatus::Online;
        } else if upper.contains("OFFLINE") {
            return StationStatus::Offline;
        } else if upper.contains("TIMEOUT") {
            return StationStatus::Timeout;
        } else if upper.contains("DISCONNECT") {
            return StationStatus::Disconnect;
        }
    }

    if record.status_from_icon != StationStatus::Unknown {
        return record.status_from_icon;
    }

    status_by_timestamp(record.date.as_deref(), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet_status::FleetStatusEntry;

    fn record_with(
        code: Option<&str>,
        status_text: Option<&str>,
        icon_status: StationStatus,
        date: Option<&str>,
    ) -> StationRecord {
        StationRecord {
            station_code: code.map(str::to_string),
            status_text: status_text.map(str::to_string),
            status_from_icon: icon_status,
            date: date.map(str::to_string),
            ..StationRecord::default()
        }
    }

    fn fleet_with(code: &str, status: StationStatus) -> FleetStatusTable {
        let mut table = FleetStatusTable::new();
        table.insert(
            code.to_string(),
            FleetStatusEntry {
                status,
                status_src: None,
                status_alt: None,
                row_data: Vec::new(),
            },
        );
        table
    }

    #[test]
    fn test_fleet_table_wins_over_icon() {
        let record = record_with(Some("G1001"), None, StationStatus::Online, None);
        let fleet = fleet_with("G1001", StationStatus::Offline);
        let status = determine_final_status(&record, Some(&fleet), Utc::now());
        assert_eq!(status, StationStatus::Offline);
    }

    #[test]
    fn test_unknown_fleet_entry_falls_through() {
        let record = record_with(Some("G1001"), None, StationStatus::Repair, None);
        let fleet = fleet_with("G1001", StationStatus::Unknown);
        let status = determine_final_status(&record, Some(&fleet), Utc::now());
        assert_eq!(status, StationStatus::Repair);
    }

    #[test]
    fn test_status_text_beats_icon() {
        let record = record_with(
            Some("G2"),
            Some("Sensor offline"),
            StationStatus::Online,
            None,
        );
        let status = determine_final_status(&record, None, Utc::now());
        assert_eq!(status, StationStatus::Offline);
    }

    #[test]
    fn test_status_text_normal_maps_to_online() {
        let record = record_with(Some("G2"), Some("normal"), StationStatus::Unknown, None);
        let status = determine_final_status(&record, None, Utc::now());
        assert_eq!(status, StationStatus::Online);
    }

    #[test]
    fn test_staleness_fallback_45_minutes_is_timeout() {
        let now = Utc::now();
        let date = (now - Duration::minutes(45)).format("%d/%m/%Y %H:%M").to_string();
        let record = record_with(Some("G3"), None, StationStatus::Unknown, Some(&date));
        let status = determine_final_status(&record, None, now);
        assert_eq!(status, StationStatus::Timeout);
    }

    #[test]
    fn test_staleness_recent_is_online() {
        let now = Utc::now();
        let date = (now - Duration::minutes(10)).format("%d/%m/%Y %H:%M").to_string();
        assert_eq!(
            status_by_timestamp(Some(&date), now),
            StationStatus::Online
        );
    }

    #[test]
    fn test_staleness_old_is_disconnect() {
        let now = Utc::now();
        let date = (now - Duration::hours(7)).format("%d/%m/%Y %H:%M").to_string();
        assert_eq!(
            status_by_timestamp(Some(&date), now),
            StationStatus::Disconnect
        );
    }

    #[test]
    fn test_staleness_boundary_six_hours_is_timeout() {
        let now = Utc::now();
        // Format truncates seconds, so land exactly on a minute boundary
        let truncated = parse_report_date(
            &(now - Duration::hours(6)).format("%d/%m/%Y %H:%M").to_string(),
        )
        .unwrap();
        let date = truncated.format("%d/%m/%Y %H:%M").to_string();
        assert_eq!(
            status_by_timestamp(Some(&date), truncated + Duration::hours(6)),
            StationStatus::Timeout
        );
    }

    #[test]
    fn test_missing_or_bad_date_is_disconnect() {
        assert_eq!(status_by_timestamp(None, Utc::now()), StationStatus::Disconnect);
        assert_eq!(
            status_by_timestamp(Some("soon"), Utc::now()),
            StationStatus::Disconnect
        );
    }
}
