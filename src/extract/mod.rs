//! Metric extraction, one parser per report family.
//!
//! Each family is read independently: its files are opened, parsed and closed before the
//! next family starts, and a failure in one never affects the others. The only value passed
//! between families is the [`Corner`] resolved for the power report, which the timing parser
//! reuses so both sections describe the same operating point.
//!
//! # Families
//!
//! - **[`synthesis`]**: module area and cell count from the synthesis statistics
//! - **[`signoff`]**: die/core/instance area, utilisation and routing from the signoff state
//! - **[`power`]**: power breakdown from the `Total` row of the power report
//! - **[`timing`]**: arrival, required and slack of the worst setup path
//! - **[`clock`]**: configured clock period from the resolved configuration

use std::{fs, path::Path};

use log::{debug, error, warn};

use crate::{
    ExtractError,
    fmax::derive_timing,
    layout::FlowLayout,
    locate::{Corner, RunDirectory, locate_signoff_state, resolve_corner},
    metrics::{Metric, RunMetrics},
};

pub mod clock;
pub mod power;
pub mod signoff;
pub mod synthesis;
pub mod timing;

/// Extract every metric family of a run.
///
/// This never fails. Families that cannot be extracted are logged (a warning when the file
/// is simply not there, an error when it is there but unreadable) and come back as
/// [`Metric::Absent`].
///
/// # Example
///
/// ```no_run
/// use flowmetrics::{FlowLayout, RunDirectory, extract_run};
///
/// let run = RunDirectory::new("runs/RUN_2024-05-03_09-00-00");
/// let metrics = extract_run(&run, &FlowLayout::default());
///
/// if let Some(fmax) = metrics.derived.and_then(|d| d.fmax_mhz()) {
///     println!("Fmax: {:.2} MHz", fmax);
/// }
/// ```
pub fn extract_run(run: &RunDirectory, layout: &FlowLayout) -> RunMetrics {
    let root = run.path();

    let synthesis = settle(
        "synthesis statistics",
        synthesis::read_synthesis_stats(&layout.synthesis_stats_path(root)),
    );

    let physical = settle(
        "signoff statistics",
        match locate_signoff_state(root, layout) {
            Some(path) => signoff::read_physical_stats(&path),
            None => Err(ExtractError::NotFound {
                what: "final signoff state",
                path: layout.signoff_stage_path(root).join(&layout.state_file),
            }),
        },
    );

    let corner = resolve_corner(root, layout);
    debug!("using corner {} ({:?})", corner.name, corner.dir);

    let power = settle(
        "signoff power",
        power::read_power_report(&corner, &layout.power_report),
    );
    let timing = settle(
        "signoff timing",
        timing::read_timing_report(&corner, &layout.timing_report),
    );
    let clock_period = settle(
        "clock period",
        clock::read_clock_period(&layout.resolved_config_path(root)),
    );

    let derived = derive_timing(
        clock_period.present().copied(),
        timing.present().and_then(|t| t.slack.as_deref()),
    );

    RunMetrics {
        run: run.clone(),
        corner,
        synthesis,
        physical,
        power,
        timing,
        clock_period,
        derived,
    }
}

/// Log the outcome of one family and turn it into a [`Metric`].
fn settle<T>(what: &str, result: Result<T, ExtractError>) -> Metric<T> {
    match &result {
        Ok(_) => debug!("extracted {}", what),
        Err(e) if e.is_not_found() => warn!("{}", e),
        Err(e) => error!("error parsing {}: {}", what, e),
    }
    result.into()
}

/// Read a report that must exist, mapping a missing file to [`ExtractError::NotFound`].
pub(crate) fn read_report(what: &'static str, path: &Path) -> Result<String, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::NotFound {
            what,
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of `file` inside the resolved corner.
pub(crate) fn corner_file(corner: &Corner, file: &str) -> Result<std::path::PathBuf, ExtractError> {
    corner
        .dir
        .as_ref()
        .map(|dir| dir.join(file))
        .ok_or_else(|| ExtractError::CornerUnresolved {
            stage: corner.stage.clone(),
        })
}
