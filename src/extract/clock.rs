//! Clock period from the resolved flow configuration.

use std::path::Path;

use serde_json::Value;

use crate::ExtractError;

use super::read_report;

const CLOCK_PERIOD: &str = "CLOCK_PERIOD";

/// Why a clock period could not be taken from a configuration document.
#[derive(Debug)]
pub enum ClockPeriodError {
    Json(serde_json::Error),
    Missing,
}

/// Parse `CLOCK_PERIOD` (nanoseconds) out of a resolved configuration.
///
/// The flow writes the period as a number, though hand-edited configurations sometimes quote
/// it; both forms are accepted.
pub fn parse_clock_period(input: &str) -> Result<f64, ClockPeriodError> {
    let config: Value = serde_json::from_str(input).map_err(ClockPeriodError::Json)?;

    let period = match config.get(CLOCK_PERIOD) {
        Some(Value::Number(period)) => period.as_f64(),
        Some(Value::String(period)) => period.trim().parse().ok(),
        _ => None,
    };

    period.ok_or(ClockPeriodError::Missing)
}

/// Read the clock period from the configuration at `path`.
pub fn read_clock_period(path: &Path) -> Result<f64, ExtractError> {
    let input = read_report("resolved configuration", path)?;

    parse_clock_period(&input).map_err(|e| match e {
        ClockPeriodError::Json(source) => ExtractError::Json {
            path: path.to_path_buf(),
            source,
        },
        ClockPeriodError::Missing => ExtractError::MissingField {
            path: path.to_path_buf(),
            field: CLOCK_PERIOD,
        },
    })
}
