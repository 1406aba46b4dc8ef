//! Metric records extracted from one run.
//!
//! Records are plain values built once and never mutated. A family that could not be
//! extracted is [`Metric::Absent`], which is never confused with a present zero.

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;

use crate::{ExtractError, locate::Corner, locate::RunDirectory};

/// Outcome of extracting one metric family.
#[derive(Debug)]
pub enum Metric<T> {
    Present(T),
    Absent(ExtractError),
}

impl<T> Metric<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Metric::Present(value) => Some(value),
            Metric::Absent(_) => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Metric::Present(_))
    }

    /// Why the metric is missing, if it is.
    pub fn reason(&self) -> Option<&ExtractError> {
        match self {
            Metric::Present(_) => None,
            Metric::Absent(reason) => Some(reason),
        }
    }
}

impl<T> From<Result<T, ExtractError>> for Metric<T> {
    fn from(result: Result<T, ExtractError>) -> Self {
        match result {
            Ok(value) => Metric::Present(value),
            Err(reason) => Metric::Absent(reason),
        }
    }
}

/// A figure kept exactly as the tool wrote it.
///
/// The JSON text is displayed verbatim (`22500.0`, `1e-05`), strings without their quotes.
/// Nothing is re-parsed or range-checked.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Reported(Box<RawValue>);

impl Reported {
    /// `None` for a JSON `null`, which stands for a metric the tool did not compute.
    pub fn from_raw(raw: Box<RawValue>) -> Option<Self> {
        (raw.get() != "null").then_some(Reported(raw))
    }

    /// Wrap a JSON fragment such as `"22500.0"`.
    pub fn parse(json: &str) -> serde_json::Result<Option<Self>> {
        RawValue::from_string(json.trim().to_string()).map(Self::from_raw)
    }

    /// The JSON text of the figure.
    pub fn as_json(&self) -> &str {
        self.0.get()
    }

    pub fn as_f64(&self) -> Option<f64> {
        serde_json::from_str(self.as_json()).ok()
    }
}

impl PartialEq for Reported {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.as_json();
        if text.starts_with('"') {
            if let Ok(unquoted) = serde_json::from_str::<String>(text) {
                return f.write_str(&unquoted);
            }
        }
        f.write_str(text)
    }
}

/// Post-synthesis statistics of a single module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisStats {
    pub module: String,
    /// Cell area in um^2, as reported by synthesis.
    pub area: Option<Reported>,
    pub cell_count: u64,
}

/// Physical statistics of the final signoff stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhysicalStats {
    pub die_area: Option<Reported>,
    pub core_area: Option<Reported>,
    pub instance_area: Option<Reported>,
    /// Fraction of the core occupied by instances, 0 to 1. The only figure shown rescaled.
    pub utilization: Option<f64>,
    pub wire_length: Option<Reported>,
    pub via_count: Option<Reported>,
    pub pin_count: Option<Reported>,
    pub cell_count: Option<Reported>,
}

/// Power totals in watts, verbatim from the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerBreakdown {
    pub internal: String,
    pub switching: String,
    pub leakage: String,
    pub total: String,
}

/// The first (worst) path of a setup timing report, in nanoseconds, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingPath {
    pub arrival_time: Option<String>,
    pub required_time: Option<String>,
    pub slack: Option<String>,
}

impl TimingPath {
    pub fn is_complete(&self) -> bool {
        self.arrival_time.is_some() && self.required_time.is_some() && self.slack.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.arrival_time.is_none() && self.required_time.is_none() && self.slack.is_none()
    }
}

/// Maximum frequency derived from the clock period and the worst slack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DerivedTiming {
    /// `min_period > 0`; `fmax_mhz = 1000 / min_period`.
    Defined {
        clock_period: f64,
        min_period: f64,
        fmax_mhz: f64,
    },
    /// The slack swallows the whole period; no frequency can be derived.
    Undefined { clock_period: f64, min_period: f64 },
}

impl DerivedTiming {
    pub fn min_period(&self) -> f64 {
        match self {
            DerivedTiming::Defined { min_period, .. } | DerivedTiming::Undefined { min_period, .. } => {
                *min_period
            }
        }
    }

    pub fn fmax_mhz(&self) -> Option<f64> {
        match self {
            DerivedTiming::Defined { fmax_mhz, .. } => Some(*fmax_mhz),
            DerivedTiming::Undefined { .. } => None,
        }
    }
}

/// Everything extracted from one run.
#[derive(Debug)]
pub struct RunMetrics {
    pub run: RunDirectory,
    /// Corner shared by the power and timing reports.
    pub corner: Corner,
    pub synthesis: Metric<SynthesisStats>,
    pub physical: Metric<PhysicalStats>,
    pub power: Metric<PowerBreakdown>,
    pub timing: Metric<TimingPath>,
    /// Clock period in nanoseconds.
    pub clock_period: Metric<f64>,
    /// Only computed when both the clock period and a numeric slack are known.
    pub derived: Option<DerivedTiming>,
}

/// Serialisable view of [`RunMetrics`], absent families become `null`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub run: &'a str,
    pub path: String,
    pub corner: &'a str,
    pub synthesis: Option<&'a SynthesisStats>,
    pub physical: Option<&'a PhysicalStats>,
    pub power: Option<&'a PowerBreakdown>,
    pub timing: Option<&'a TimingPath>,
    pub clock_period: Option<f64>,
    pub derived: Option<DerivedTiming>,
}

impl RunMetrics {
    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            run: self.run.name(),
            path: self.run.path().display().to_string(),
            corner: &self.corner.name,
            synthesis: self.synthesis.present(),
            physical: self.physical.present(),
            power: self.power.present(),
            timing: self.timing.present(),
            clock_period: self.clock_period.present().copied(),
            derived: self.derived,
        }
    }
}
