//! Physical statistics from the signoff `state_out.json`.
//!
//! The flow accumulates its metrics in a flat `metrics` mapping with keys such as
//! `design__die__area` or `route__vias`. Each field is optional: a metric the flow did not
//! record leaves its field empty without invalidating the others.

use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::{
    ExtractError,
    metrics::{PhysicalStats, Reported},
};

use super::read_report;

#[derive(Deserialize)]
struct StateDocument {
    #[serde(default)]
    metrics: HashMap<String, Box<RawValue>>,
}

/// Parse the physical statistics of a state document.
///
/// Figures are kept as written; only the utilisation is read as a number.
pub fn parse_physical_stats(input: &str) -> serde_json::Result<PhysicalStats> {
    let StateDocument { mut metrics } = serde_json::from_str(input)?;
    let mut reported = |key: &str| metrics.remove(key).and_then(Reported::from_raw);

    let utilization = reported("design__instance__utilization");
    Ok(PhysicalStats {
        die_area: reported("design__die__area"),
        core_area: reported("design__core__area"),
        instance_area: reported("design__instance__area"),
        utilization: utilization.and_then(|u| u.as_f64()),
        wire_length: reported("route__wirelength"),
        via_count: reported("route__vias"),
        pin_count: reported("design__io"),
        cell_count: reported("design__instance__count"),
    })
}

/// Read and parse the state document at `path`.
pub fn read_physical_stats(path: &Path) -> Result<PhysicalStats, ExtractError> {
    let input = read_report("final signoff state", path)?;

    parse_physical_stats(&input).map_err(|source| ExtractError::Json {
        path: path.to_path_buf(),
        source,
    })
}
