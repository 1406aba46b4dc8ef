//! Metrics as a table, one row per value.
//!
//! The same [`Table`] is printed on the console (`--table`) and exported as CSV (`--csv`).
//! Absent values show `N/A` and figures appear as written, exactly as in the text report.

use prettytable::*;

use crate::metrics::{DerivedTiming, RunMetrics};

use super::NOT_AVAILABLE;

fn cell_value<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Build the `Section | Metric | Value | Unit` table of a run.
pub fn metrics_table(metrics: &RunMetrics) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Section", "Metric", "Value", "Unit"]);
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let synthesis = metrics.synthesis.present();
    table.add_row(row![
        "Synthesis",
        "Module",
        cell_value(synthesis.map(|s| s.module.clone())),
        ""
    ]);
    table.add_row(row![
        "Synthesis",
        "Area",
        cell_value(synthesis.and_then(|s| s.area.as_ref())),
        "um^2"
    ]);
    table.add_row(row![
        "Synthesis",
        "Cell Count",
        cell_value(synthesis.map(|s| s.cell_count)),
        ""
    ]);

    let physical = metrics.physical.present();
    let reals = [
        ("Die Area", physical.and_then(|p| p.die_area.as_ref()), "um^2"),
        ("Core Area", physical.and_then(|p| p.core_area.as_ref()), "um^2"),
        ("Instance Area", physical.and_then(|p| p.instance_area.as_ref()), "um^2"),
        ("Wire Length", physical.and_then(|p| p.wire_length.as_ref()), "um"),
    ];
    for (metric, value, unit) in reals {
        table.add_row(row!["Signoff", metric, cell_value(value), unit]);
    }
    table.add_row(row![
        "Signoff",
        "Utilization",
        cell_value(
            physical
                .and_then(|p| p.utilization)
                .map(|u| format!("{:.2}", u * 100.0))
        ),
        "%"
    ]);
    let counts = [
        ("Via Count", physical.and_then(|p| p.via_count.as_ref())),
        ("Input/Output Pins", physical.and_then(|p| p.pin_count.as_ref())),
        ("Cell Count (Physical)", physical.and_then(|p| p.cell_count.as_ref())),
    ];
    for (metric, value) in counts {
        table.add_row(row!["Signoff", metric, cell_value(value), ""]);
    }

    let power = metrics.power.present();
    let powers = [
        ("Total Power", power.map(|p| p.total.as_str())),
        ("Internal Power", power.map(|p| p.internal.as_str())),
        ("Switching Power", power.map(|p| p.switching.as_str())),
        ("Leakage Power", power.map(|p| p.leakage.as_str())),
    ];
    for (metric, value) in powers {
        table.add_row(row!["Power", metric, cell_value(value), "W"]);
    }

    let timing = metrics.timing.present();
    let times = [
        (
            "Data Arrival Time",
            timing.and_then(|t| t.arrival_time.as_deref()),
        ),
        (
            "Data Required Time",
            timing.and_then(|t| t.required_time.as_deref()),
        ),
        ("Slack", timing.and_then(|t| t.slack.as_deref())),
    ];
    for (metric, value) in times {
        table.add_row(row!["Timing", metric, cell_value(value), "ns"]);
    }
    table.add_row(row![
        "Timing",
        "Clock Period",
        cell_value(metrics.clock_period.present()),
        "ns"
    ]);
    let fmax = match metrics.derived {
        Some(DerivedTiming::Defined { fmax_mhz, .. }) => format!("{:.2}", fmax_mhz),
        Some(DerivedTiming::Undefined { .. }) => "Undefined".to_string(),
        None => NOT_AVAILABLE.to_string(),
    };
    table.add_row(row!["Timing", "Max Frequency", fmax, "MHz"]);

    table
}
