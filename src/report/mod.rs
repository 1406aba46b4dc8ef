//! Manufacturability report.
//!
//! The report is a fixed sequence of sections, each rendering `N/A` when its metric family
//! is absent:
//!
//! ```text
//! === Report for Run: RUN_2024-05-03_09-00-00 ===
//! Path: runs/RUN_2024-05-03_09-00-00
//!
//! --- Synthesis Statistics ---
//! Module: spike_detector
//! Area: 1534.2208 um^2
//! Cell Count: 62
//!
//! --- Signoff Statistics (Physical) ---
//! ...
//! --- Signoff Power (nom_tt_025C_1v80) ---
//! ...
//! --- Signoff Timing (Setup/Max - nom_tt_025C_1v80) ---
//! ...
//! ```
//!
//! Lines go to the console and to the report file as they are produced, through a
//! [`ReportSink`]. A failing report file does not interrupt the console output.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use flowmetrics::report::{ReportArgs, report_main};
//!
//! let args = ReportArgs {
//!     flow_dir: "librelane".into(),
//!     runs_dir: None,
//!     run: None,
//!     corner: None,
//!     output: None,
//!     csv: Some("metrics.csv".into()),
//!     json: None,
//!     table: true,
//! };
//!
//! report_main(args)?;
//! # Ok(())
//! # }
//! ```

use std::{
    fmt::Display,
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::{error, info};

use crate::{
    extract::extract_run,
    layout::{DEFAULT_REPORT_NAME, DEFAULT_RUNS_DIR, FlowLayout},
    locate::{RunDirectory, find_latest_run},
    metrics::{DerivedTiming, Metric, RunMetrics},
};

pub mod table;

/// Placeholder for anything that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Command-line arguments for the report command.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Flow directory holding `runs/`; the report is written here by default
    #[clap(long, default_value = ".")]
    pub flow_dir: PathBuf,

    /// Directory holding the RUN_* directories (default: <flow-dir>/runs)
    #[clap(long)]
    pub runs_dir: Option<PathBuf>,

    /// Report on this run directory instead of the most recent one
    #[clap(long)]
    pub run: Option<PathBuf>,

    /// Preferred STA corner for power and timing (default: nom_tt_025C_1v80)
    #[clap(long)]
    pub corner: Option<String>,

    /// Report output file (default: <flow-dir>/report_manufacturability.txt)
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Output CSV file with one row per metric
    #[clap(long)]
    pub csv: Option<PathBuf>,

    /// Output JSON file with the extracted records
    #[clap(long)]
    pub json: Option<PathBuf>,

    /// Print a metrics table after the report
    #[clap(long)]
    pub table: bool,
}

/// Tee for report lines: every line goes to the console, and to the report file while that
/// file is still writable.
pub struct ReportSink<'a> {
    console: &'a mut dyn Write,
    file: Option<Box<dyn Write + 'a>>,
    file_error: Option<io::Error>,
}

impl<'a> ReportSink<'a> {
    pub fn new(console: &'a mut dyn Write, file: Option<Box<dyn Write + 'a>>) -> Self {
        Self {
            console,
            file,
            file_error: None,
        }
    }

    /// Emit one line. Only console failures are returned; a file failure is kept for
    /// [`ReportSink::finish`] and the file is dropped.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.console, "{}", text)?;
        self.console.flush()?;

        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", text) {
                error!("report file is no longer writable: {}", e);
                self.file = None;
                self.file_error = Some(e);
            }
        }

        Ok(())
    }

    /// Flush the report file and report whether everything reached it.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.file_error.take() {
            return Err(e);
        }
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn with_unit<T: Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{} {}", v, unit))
}

/// Utilisation is stored as a fraction and shown as a percentage.
fn percent(fraction: Option<f64>) -> String {
    fraction.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |f| format!("{:.2}%", f * 100.0),
    )
}

/// Write the complete report for `metrics`, section by section.
pub fn write_report(metrics: &RunMetrics, sink: &mut ReportSink) -> io::Result<()> {
    sink.line(format!("=== Report for Run: {} ===", metrics.run.name()))?;
    sink.line(format!("Path: {}", metrics.run.path().display()))?;
    sink.line("")?;

    write_synthesis(metrics, sink)?;
    write_physical(metrics, sink)?;
    write_power(metrics, sink)?;
    write_timing(metrics, sink)?;

    Ok(())
}

fn write_synthesis(metrics: &RunMetrics, sink: &mut ReportSink) -> io::Result<()> {
    sink.line("--- Synthesis Statistics ---")?;
    match &metrics.synthesis {
        Metric::Present(stats) => {
            sink.line(format!("Module: {}", stats.module))?;
            sink.line(format!("Area: {}", with_unit(stats.area.as_ref(), "um^2")))?;
            sink.line(format!("Cell Count: {}", stats.cell_count))?;
        }
        Metric::Absent(_) => sink.line(NOT_AVAILABLE)?,
    }
    sink.line("")
}

fn write_physical(metrics: &RunMetrics, sink: &mut ReportSink) -> io::Result<()> {
    sink.line("--- Signoff Statistics (Physical) ---")?;
    match &metrics.physical {
        Metric::Present(stats) => {
            sink.line(format!("Die Area: {}", with_unit(stats.die_area.as_ref(), "um^2")))?;
            sink.line(format!("Core Area: {}", with_unit(stats.core_area.as_ref(), "um^2")))?;
            sink.line(format!(
                "Instance Area: {}",
                with_unit(stats.instance_area.as_ref(), "um^2")
            ))?;
            sink.line(format!("Utilization: {}", percent(stats.utilization)))?;
            sink.line(format!("Wire Length: {}", with_unit(stats.wire_length.as_ref(), "um")))?;
            sink.line(format!("Via Count: {}", or_na(stats.via_count.as_ref())))?;
            sink.line(format!("Input/Output Pins: {}", or_na(stats.pin_count.as_ref())))?;
            // Post-fill, including buffers and tap cells
            sink.line(format!("Cell Count (Physical): {}", or_na(stats.cell_count.as_ref())))?;
        }
        Metric::Absent(_) => sink.line(NOT_AVAILABLE)?,
    }
    sink.line("")
}

fn write_power(metrics: &RunMetrics, sink: &mut ReportSink) -> io::Result<()> {
    sink.line(format!("--- Signoff Power ({}) ---", metrics.corner.name))?;
    match &metrics.power {
        Metric::Present(power) => {
            sink.line(format!("Total Power: {} W", power.total))?;
            sink.line(format!("Internal Power: {} W", power.internal))?;
            sink.line(format!("Switching Power: {} W", power.switching))?;
            sink.line(format!("Leakage Power: {} W", power.leakage))?;
        }
        Metric::Absent(_) => sink.line(NOT_AVAILABLE)?,
    }
    sink.line("")
}

fn write_timing(metrics: &RunMetrics, sink: &mut ReportSink) -> io::Result<()> {
    sink.line(format!(
        "--- Signoff Timing (Setup/Max - {}) ---",
        metrics.corner.name
    ))?;
    match &metrics.timing {
        Metric::Present(timing) => {
            sink.line(format!(
                "Data Arrival Time: {}",
                with_unit(timing.arrival_time.as_deref(), "ns")
            ))?;
            sink.line(format!(
                "Data Required Time: {}",
                with_unit(timing.required_time.as_deref(), "ns")
            ))?;
            sink.line(format!("Slack: {}", with_unit(timing.slack.as_deref(), "ns")))?;

            match metrics.derived {
                Some(DerivedTiming::Defined {
                    clock_period,
                    fmax_mhz,
                    ..
                }) => {
                    sink.line(format!("Clock Period: {} ns", clock_period))?;
                    sink.line(format!("Max Frequency (Theoretical): {:.2} MHz", fmax_mhz))?;
                }
                Some(DerivedTiming::Undefined { .. }) => {
                    sink.line("Max Frequency: Undefined (Slack > Period?)")?;
                }
                None => {}
            }
        }
        Metric::Absent(_) => sink.line(NOT_AVAILABLE)?,
    }
    sink.line("")
}

fn open_report(path: &Path) -> Option<Box<dyn Write>> {
    match fs::File::create(path) {
        Ok(file) => Some(Box::new(BufWriter::new(file))),
        Err(e) => {
            error!("cannot create {}: {}", path.display(), e);
            None
        }
    }
}

/// Summarise a run and write the manufacturability report.
///
/// This function:
/// 1. Selects the run (`--run`, or the most recent `RUN_*` under the runs directory)
/// 2. Extracts every metric family
/// 3. Streams the report to stdout and to the output file
/// 4. Optionally prints the metrics table and writes CSV/JSON exports
///
/// When there is no run at all this prints a notice and returns without writing anything.
pub fn report_main(args: ReportArgs) -> Result<()> {
    let ReportArgs {
        flow_dir,
        runs_dir,
        run,
        corner,
        output,
        csv,
        json,
        table: print_table,
    } = args;

    let layout = match corner {
        Some(corner) => FlowLayout::default().with_corner(corner),
        None => FlowLayout::default(),
    };

    let run = match run {
        Some(path) => {
            ensure!(
                path.is_dir(),
                "run directory {} does not exist",
                path.display()
            );
            RunDirectory::new(path)
        }
        None => {
            let runs_dir = runs_dir.unwrap_or_else(|| flow_dir.join(DEFAULT_RUNS_DIR));
            match find_latest_run(&runs_dir) {
                Some(run) => run,
                None => {
                    println!("No runs found in {}", runs_dir.display());
                    return Ok(());
                }
            }
        }
    };
    info!("reporting on {}", run.path().display());

    let metrics = extract_run(&run, &layout);

    let output = output.unwrap_or_else(|| flow_dir.join(DEFAULT_REPORT_NAME));
    let stdout = io::stdout();
    let mut console = stdout.lock();

    let mut sink = ReportSink::new(&mut console, open_report(&output));
    let opened = sink.file.is_some();
    write_report(&metrics, &mut sink)?;

    match (opened, sink.finish()) {
        (true, Ok(())) => writeln!(console, "Report exported to: {}", output.display())?,
        (true, Err(e)) => writeln!(console, "Failed to export report: {}", e)?,
        (false, _) => writeln!(
            console,
            "Failed to export report: cannot create {}",
            output.display()
        )?,
    }

    let summary_table = table::metrics_table(&metrics);

    if print_table {
        writeln!(console)?;
        summary_table.print(&mut console)?;
    }

    if let Some(path) = csv {
        let file = fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        summary_table
            .to_csv(file)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(path) = json {
        let file = fs::File::create(&path)
            .map(BufWriter::new)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &metrics.summary())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
