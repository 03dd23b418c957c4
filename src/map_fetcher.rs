use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::fetch;
use crate::fetch_error::FetchError;
use crate::fleet_status::FleetStatusTable;
use crate::setmap::extractor::extract_stations;
use crate::setmap::StationRecord;

/// Fetches the portal's map page and extracts station records from its
/// inline marker calls.
#[derive(Clone)]
pub struct MapPageFetcher {
    client: reqwest::Client,
    url: String,
}

impl MapPageFetcher {
    pub fn new(url: String) -> Self {
        Self {
            client: fetch::default_client(),
            url,
        }
    }

    #[instrument(skip(self, fleet), fields(url = %self.url))]
    pub async fn fetch_stations(
        &self,
        fleet: Option<&FleetStatusTable>,
    ) -> Result<Vec<StationRecord>, FetchError> {
        debug!("Sending HTTP request for map page");
        let html = fetch::get_text(&self.client, &self.url).await?;
        debug!("Retrieved map page, size: {} bytes", html.len());

        let stations = extract_stations(&html, fleet, Utc::now());
        if stations.is_empty() {
            warn!("Map page contained no marker calls");
        }
        Ok(stations)
    }
}
