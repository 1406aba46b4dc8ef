//! Run-metrics extraction for chip-design build flows.
//!
//! A build flow writes one `RUN_<tag>` directory per invocation, and inside it one numbered
//! directory per stage (`06-yosys-synthesis`, `54-openroad-stapostpnr`, ...). Each stage leaves
//! behind its own report, in whatever format the underlying tool produces. This library finds
//! the most recent run, pulls a fixed set of physical, power and timing figures out of those
//! reports, derives the maximum operating frequency and assembles a plain-text summary.
//!
//! # Workflow
//!
//! 1. **Locate** ([`locate`]): pick the latest run and resolve each report, falling back to a
//!    directory scan when a stage was renumbered.
//! 2. **Extract** ([`extract`]): parse every report independently. A missing or malformed
//!    report never aborts the pipeline; it yields [`Metric::Absent`] instead.
//! 3. **Derive** ([`fmax`]): combine the configured clock period with the worst slack.
//! 4. **Report** ([`report`]): stream the summary to stdout and to the report file.
//!
//! # Usage Example
//!
//! ```no_run
//! use flowmetrics::{FlowLayout, extract_run, find_latest_run};
//! use std::path::Path;
//!
//! let layout = FlowLayout::default();
//! if let Some(run) = find_latest_run(Path::new("runs")) {
//!     let metrics = extract_run(&run, &layout);
//!     if let Some(stats) = metrics.synthesis.present() {
//!         println!("{}: {} cells", stats.module, stats.cell_count);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - **[`layout`]**: stage directory and file naming conventions of the flow
//! - **[`locate`]**: run selection and candidate-path resolution
//! - **[`metrics`]**: typed, immutable metric records
//! - **[`extract`]**: one parser per report family
//! - **[`fmax`]**: derived maximum frequency
//! - **[`report`]**: text report, metrics table and exports

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub mod extract;
pub mod fmax;
pub mod layout;
pub mod locate;
pub mod metrics;
pub mod report;

pub use extract::extract_run;
pub use fmax::{FmaxArgs, derive_timing, fmax_main};
pub use layout::FlowLayout;
pub use locate::{Corner, LatestArgs, RunDirectory, find_latest_run, latest_main};
pub use metrics::*;
pub use report::{ReportArgs, report_main};

/// Reasons a metric could not be extracted from a run.
///
/// None of these abort the pipeline. They are carried inside [`Metric::Absent`] so the report
/// can still be assembled.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// An expected report file does not exist.
    #[error("{what} not found at {}", .path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// The STA stage has no corner directory to read power or timing from.
    #[error("no analysis corner found under {}", .stage.display())]
    CornerUnresolved { stage: PathBuf },

    /// The report exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A JSON report is not well formed or does not have the expected shape.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The synthesis statistics list no module.
    #[error("no module statistics in {}", .path.display())]
    NoModules { path: PathBuf },

    /// The power report has no usable `Total` row.
    #[error("no `Total` row in {}", .path.display())]
    NoTotalLine { path: PathBuf },

    /// None of the timing markers appear in the path report.
    #[error("no data arrival, data required or slack line in {}", .path.display())]
    NoTimingMarkers { path: PathBuf },

    /// A required field is absent or not numeric.
    #[error("`{field}` is missing or not numeric in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

impl ExtractError {
    /// Whether the error means "nothing there" rather than "something broken there".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExtractError::NotFound { .. } | ExtractError::CornerUnresolved { .. }
        )
    }
}

/// Command-line interface of the flow metrics tool.
#[derive(Debug, Parser)]
#[clap(
    name = "flowmetrics",
    about = "Extract physical, power and timing metrics from chip-design flow runs"
)]
pub struct CLIArguments {
    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarise the latest run and write the manufacturability report.
    Report(ReportArgs),
    /// Print the path of the most recent run.
    Latest(LatestArgs),
    /// Compute the maximum frequency from a clock period and a slack.
    Fmax(FmaxArgs),
}
