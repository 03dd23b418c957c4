use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub map_url: String,
    pub fleet_status_url: String,
    pub json_output_path: String,
    pub csv_output_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            map_url: env::var("MAP_URL")?,
            fleet_status_url: env::var("FLEET_STATUS_URL")?,
            json_output_path: env::var("JSON_OUTPUT_PATH")
                .unwrap_or_else(|_| "stations.json".to_string()),
            csv_output_path: env::var("CSV_OUTPUT_PATH")
                .unwrap_or_else(|_| "stations.csv".to_string()),
        })
    }
}
