use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use raingauge_monitor::export;
use raingauge_monitor::fleet_status::parse_fleet_table;
use raingauge_monitor::normalize;
use raingauge_monitor::setmap::extractor::extract_stations;

#[derive(Parser)]
#[command(name = "parse-snapshot")]
#[command(about = "Run the parsing pipeline over saved portal pages", long_about = None)]
struct Cli {
    /// Saved map page HTML
    map_page: PathBuf,

    /// Saved fleet-status page HTML
    #[arg(long)]
    fleet_page: Option<PathBuf>,

    /// Write the JSON export here
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write the CSV export here
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Number of sample stations to print
    #[arg(long, default_value_t = 10)]
    sample: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let fleet = match &cli.fleet_page {
        Some(path) => {
            let html = fs::read_to_string(path)?;
            let table = parse_fleet_table(&html);
            println!("Fleet page: {} stations classified", table.len());
            table
        }
        None => Default::default(),
    };
    let fleet_evidence = (!fleet.is_empty()).then_some(&fleet);

    let html = fs::read_to_string(&cli.map_page)?;
    let records = extract_stations(&html, fleet_evidence, Utc::now());
    println!("Map page: {} marker calls parsed", records.len());

    let normalized = normalize::dedupe_latest(records);
    println!("{} stations after deduplication\n", normalized.len());

    let mut counts = std::collections::BTreeMap::new();
    for record in &normalized {
        *counts.entry(record.record.status.as_str()).or_insert(0usize) += 1;
    }
    println!("Status summary:");
    for (status, count) in &counts {
        let pct = *count as f64 / normalized.len().max(1) as f64 * 100.0;
        println!("  {status:12} {count:4} stations ({pct:5.1}%)");
    }

    println!("\nSample stations (first {}):", cli.sample);
    for record in normalized.iter().take(cli.sample) {
        let station = &record.record;
        println!(
            "  {} {} | rain={} battery={} last={}",
            station.station_code.as_deref().unwrap_or("?"),
            station.status,
            record
                .rain_mm
                .map(|v| format!("{v} mm"))
                .unwrap_or_else(|| "-".to_string()),
            station
                .battery_v
                .map(|v| format!("{v} V"))
                .unwrap_or_else(|| "-".to_string()),
            station.date.as_deref().unwrap_or("-"),
        );
    }

    if let Some(path) = &cli.json_out {
        export::write_json(&normalized, path)?;
        println!("\nWrote {}", path.display());
    }
    if let Some(path) = &cli.csv_out {
        export::write_csv(&normalized, path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
