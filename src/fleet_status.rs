//! Fleet-status table: per-station status evidence scraped from the
//! portal's all-stations summary page.

use std::collections::HashMap;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::fetch;
use crate::fetch_error::FetchError;
use crate::status::{classify, StationStatus};

/// One row of fleet evidence for a station code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStatusEntry {
    pub status: StationStatus,
    pub status_src: Option<String>,
    pub status_alt: Option<String>,
    /// Leading cell texts from the source row (up to 10), kept for
    /// troubleshooting classification mismatches.
    pub row_data: Vec<String>,
}

/// Mapping from station code to its fleet evidence. The reconciler only
/// reads this table, never mutates it.
pub type FleetStatusTable = HashMap<String, FleetStatusEntry>;

/// Parse the fleet-summary page into a status table.
///
/// The table lives in the first `table` under `div.panel-body`; the first
/// row is a header. A row's station code is the first of its leading three
/// cells whose text is `G` followed by digits; rows without one are
/// skipped. A missing panel or table yields an empty map, not an error.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_fleet_table(html: &str) -> FleetStatusTable {
    let document = Html::parse_document(html);
    let panel_selector = Selector::parse("div.panel-body").unwrap();
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let img_selector = Selector::parse("img").unwrap();
    let code_pattern = Regex::new(r"^G\d+$").unwrap();

    let mut table = FleetStatusTable::new();

    let Some(panel) = document.select(&panel_selector).next() else {
        debug!("no panel-body element in fleet page");
        return table;
    };
    let Some(data_table) = panel.select(&table_selector).next() else {
        debug!("no table element under panel-body");
        return table;
    };

    for (row_idx, row) in data_table.select(&row_selector).enumerate() {
        if row_idx == 0 {
            continue;
        }

        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let Some(station_code) = cells
            .iter()
            .take(3)
            .find(|text| code_pattern.is_match(text.as_str()))
            .cloned()
        else {
            continue;
        };

        let status_img = row
            .select(&img_selector)
            .find(|img| img.value().attr("id").is_some_and(|id| id.contains("Img_Status")));
        let status_src = status_img.and_then(|img| img.value().attr("src")).map(str::to_string);
        let status_alt = status_img.and_then(|img| img.value().attr("alt")).map(str::to_string);

        let status = classify::from_status_image(
            status_src.as_deref().unwrap_or(""),
            status_alt.as_deref().unwrap_or(""),
        );

        table.insert(
            station_code,
            FleetStatusEntry {
                status,
                status_src,
                status_alt,
                row_data: cells.into_iter().take(10).collect(),
            },
        );
    }

    debug!("parsed fleet status for {} stations", table.len());
    table
}

/// Fetches and parses the fleet-summary page.
#[derive(Clone)]
pub struct FleetStatusFetcher {
    client: reqwest::Client,
    url: String,
}

impl FleetStatusFetcher {
    pub fn new(url: String) -> Self {
        Self {
            client: fetch::default_client(),
            url,
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_fleet_status(&self) -> Result<FleetStatusTable, FetchError> {
        debug!("Sending HTTP request for fleet-status page");
        let html = fetch::get_text(&self.client, &self.url).await?;
        debug!("Retrieved fleet page, size: {} bytes", html.len());

        let table = parse_fleet_table(&html);
        if table.is_empty() {
            warn!("Fleet-status page yielded no station rows");
        }
        Ok(table)
    }
}
