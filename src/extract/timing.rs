//! Worst setup path from an OpenSTA `max.rpt`.
//!
//! Only the first reported path is of interest:
//!
//! ```text
//!                   8.528255   data arrival time
//!  ...
//!                  20.476229   data required time
//! ---------------------------------------------------------
//!                  20.476229   data required time
//!                  -8.528255   data arrival time
//! ---------------------------------------------------------
//!                  11.947974   slack (MET)
//! ```
//!
//! Each marker is captured once, from its first occurrence, and the value is the first
//! token of the matching line.

use crate::{ExtractError, locate::Corner, metrics::TimingPath};

use super::{corner_file, read_report};

const ARRIVAL: &str = "data arrival time";
const REQUIRED: &str = "data required time";
const SLACK: &str = "slack";

fn first_token(line: &str) -> Option<String> {
    line.split_whitespace().next().map(str::to_string)
}

/// Scan a timing report for the first arrival, required and slack lines.
///
/// Markers that never appear leave their field empty.
pub fn parse_timing_report(input: &str) -> TimingPath {
    let mut path = TimingPath::default();

    for line in input.lines() {
        if path.arrival_time.is_none() && line.contains(ARRIVAL) {
            path.arrival_time = first_token(line);
        } else if path.required_time.is_none() && line.contains(REQUIRED) {
            path.required_time = first_token(line);
        } else if path.slack.is_none() && line.contains(SLACK) {
            path.slack = first_token(line);
        }

        if path.is_complete() {
            break;
        }
    }

    path
}

/// Read the timing report `file` of the resolved corner.
///
/// A report with none of the markers is treated as unparsable; one with only some of them
/// yields a partial [`TimingPath`].
pub fn read_timing_report(corner: &Corner, file: &str) -> Result<TimingPath, ExtractError> {
    let path = corner_file(corner, file)?;
    let input = read_report("timing report", &path)?;

    let timing = parse_timing_report(&input);
    if timing.is_empty() {
        return Err(ExtractError::NoTimingMarkers { path });
    }

    Ok(timing)
}
