//! JSON and CSV writers for normalized station records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::normalize::NormalizedRecord;
use crate::setmap::Value;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Fixed CSV column order for the tabular export.
const CSV_COLUMNS: [&str; 15] = [
    "station_code",
    "name",
    "lat",
    "lon",
    "status",
    "rain",
    "rain_mm",
    "date",
    "date_iso",
    "temperature_c",
    "humidity_pct",
    "battery_v",
    "solar_volt_v",
    "icon_filename",
    "image_path",
];

/// Write the nested document export: every record field, pretty-printed.
pub fn write_json(records: &[NormalizedRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write the tabular export with the fixed 15-column layout.
pub fn write_csv(records: &[NormalizedRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    csv_to_writer(records, BufWriter::new(file))?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// CSV serialization against any writer, split out for testability.
pub fn csv_to_writer<W: Write>(records: &[NormalizedRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;

    for normalized in records {
        let record = &normalized.record;
        csv_writer.write_record([
            cell_opt_str(record.station_code.as_deref()),
            cell_value(record.name.as_ref()),
            cell_value(record.lat.as_ref()),
            cell_value(record.lon.as_ref()),
            record.status.as_str().to_string(),
            cell_opt_str(record.rain.as_deref()),
            cell_opt_f64(normalized.rain_mm),
            cell_opt_str(record.date.as_deref()),
            cell_opt_str(normalized.date_iso.as_deref()),
            cell_opt_f64(record.temperature_c),
            cell_opt_f64(record.humidity_pct),
            cell_opt_f64(record.battery_v),
            cell_opt_f64(record.solar_volt_v),
            cell_value(record.icon_filename.as_ref()),
            cell_value(record.image_path.as_ref()),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn cell_value(value: Option<&Value>) -> String {
    value.map(Value::render).unwrap_or_default()
}

fn cell_opt_str(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn cell_opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
