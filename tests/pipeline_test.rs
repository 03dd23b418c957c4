// End-to-end pipeline test: page text -> extraction -> reconciliation ->
// deduplication -> CSV export, with no network involved.

use chrono::Utc;

use raingauge_monitor::export::csv_to_writer;
use raingauge_monitor::fleet_status::parse_fleet_table;
use raingauge_monitor::normalize::dedupe_latest;
use raingauge_monitor::setmap::extractor::extract_stations;
use raingauge_monitor::status::StationStatus;

const MAP_PAGE: &str = r#"
<html><body><script>
SetMap('lat','lon','icon','type','img','name','info','iconfile','code');
SetMap(13.10, 100.50, {scale:1}, 1, 'img/pin.png', 'Station A',
  'Code: G2002<br>Rain: 1.2 mm<br>Date: 01/01/2024 09:00',
  'green_online.png', 'G2002', 0, 13.10, 100.50, 0, '', '');
SetMap(13.20, 100.60, {scale:1}, 1, 'img/pin.png', 'Station B',
  'Code: G3003<br>Rain: 3.0 mm<br>Date: 02/01/2024 10:00',
  'raingauge-7.png', 'G3003', 0, 13.20, 100.60, 0, '', '');
SetMap(13.20, 100.60, {scale:1}, 1, 'img/pin.png', 'Station B',
  'Code: G3003<br>Rain: 5.0 mm<br>Date: 02/01/2024 12:00',
  'raingauge-7.png', 'G3003', 0, 13.20, 100.60, 0, '', '');
SetMap(13.30, 100.70, {scale:1}, 1, 'img/pin.png', 'Station C',
  'Code: G4004<br>Rain: 0.0 mm<br>Date: later<br>Status: Timeout',
  'raingauge-2.png', 'G4004', 0, 13.30, 100.70, 0, '', '');
</script></body></html>
"#;

const FLEET_PAGE: &str = r#"
<div class="panel-body"><table>
  <tr><th>No</th><th>Code</th><th>Status</th></tr>
  <tr><td>1</td><td>G3003</td>
      <td><img id="gv_Img_Status_0" src="/img/led_red.gif" alt="offline"></td></tr>
</table></div>
"#;

#[test]
fn test_full_pipeline() {
    let fleet = parse_fleet_table(FLEET_PAGE);
    let records = extract_stations(MAP_PAGE, Some(&fleet), Utc::now());

    // Header discarded, four data calls parsed
    assert_eq!(records.len(), 4);

    let normalized = dedupe_latest(records);
    assert_eq!(normalized.len(), 3);

    let by_code = |code: &str| {
        normalized
            .iter()
            .find(|r| r.station_code() == code)
            .unwrap()
    };

    // Icon evidence only
    let g2002 = by_code("G2002");
    assert_eq!(g2002.record.status, StationStatus::Online);
    assert_eq!(g2002.rain_mm, Some(1.2));
    assert_eq!(g2002.date_iso.as_deref(), Some("2024-01-01T09:00:00+00:00"));

    // Fleet table beats everything; dedup kept the later observation
    let g3003 = by_code("G3003");
    assert_eq!(g3003.record.status, StationStatus::Offline);
    assert_eq!(g3003.rain_mm, Some(5.0));
    assert_eq!(g3003.record.date.as_deref(), Some("02/01/2024 12:00"));

    // No fleet entry, numbered rain icon is no evidence, status text decides
    let g4004 = by_code("G4004");
    assert_eq!(g4004.record.status, StationStatus::Timeout);
    assert!(g4004.date_iso.is_none());

    // CSV export: header plus one row per station
    let mut buffer = Vec::new();
    csv_to_writer(&normalized, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("station_code,name,lat,lon,status,"));
    assert!(lines.iter().any(|l| l.starts_with("G3003,Station B,13.2,100.6,OFFLINE,5.0 mm,5,")));
}

#[test]
fn test_pipeline_without_fleet_evidence() {
    let records = extract_stations(MAP_PAGE, None, Utc::now());
    let normalized = dedupe_latest(records);

    let g3003 = normalized
        .iter()
        .find(|r| r.station_code() == "G3003")
        .unwrap();
    // Without fleet evidence the record falls through to staleness, and a
    // 2024 report date is long past the six-hour window
    assert_eq!(g3003.record.status, StationStatus::Disconnect);
}

#[test]
fn test_pipeline_on_garbage_input_is_empty() {
    let records = extract_stations("SetMap(", None, Utc::now());
    assert!(dedupe_latest(records).is_empty());
}
