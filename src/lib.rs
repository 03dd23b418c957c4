pub mod config;
pub mod export;
mod fetch;
pub mod fetch_error;
pub mod fleet_status;
pub mod map_fetcher;
pub mod normalize;
pub mod setmap;
pub mod status;
pub mod utils;
