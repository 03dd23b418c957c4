// Station status determination
//
// Three independent heuristics guess a station's operational status
// (icon filename, fleet-table status image, free-text probe response),
// and a single reconciler merges them with timestamp staleness into one
// final status per station.

pub mod classify;
pub mod reconcile;

pub use classify::StationStatus;
