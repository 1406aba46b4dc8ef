//! Directory and file naming conventions of a flow run.
//!
//! Every stage of the flow writes into `<run>/<NN>-<tool>-<step>/`. The numbers shift when
//! steps are added or removed from the flow, which is why [`crate::locate`] treats the names
//! below as the first candidate rather than the only one.

use std::path::{Path, PathBuf};

/// Name of the report written next to the runs directory.
pub const DEFAULT_REPORT_NAME: &str = "report_manufacturability.txt";

/// Name of the directory holding the `RUN_*` directories.
pub const DEFAULT_RUNS_DIR: &str = "runs";

/// Stage and file names used to find each report inside a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLayout {
    /// Synthesis stage directory.
    pub synthesis_stage: String,
    /// Synthesis statistics, relative to the synthesis stage.
    pub synthesis_stats: PathBuf,
    /// Final signoff stage directory.
    pub signoff_stage: String,
    /// State document written at the end of every stage.
    pub state_file: String,
    /// Post-PnR static timing analysis stage directory.
    pub sta_stage: String,
    /// Corner directory tried before scanning the STA stage.
    pub preferred_corner: String,
    /// Substring identifying a nominal corner during the scan.
    pub corner_hint: String,
    /// Power report inside a corner directory.
    pub power_report: String,
    /// Setup (max) timing report inside a corner directory.
    pub timing_report: String,
    /// Resolved flow configuration at the root of a run.
    pub resolved_config: String,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            synthesis_stage: "06-yosys-synthesis".into(),
            synthesis_stats: PathBuf::from("reports").join("stat.json"),
            signoff_stage: "74-misc-reportmanufacturability".into(),
            state_file: "state_out.json".into(),
            sta_stage: "54-openroad-stapostpnr".into(),
            preferred_corner: "nom_tt_025C_1v80".into(),
            corner_hint: "nom_tt".into(),
            power_report: "power.rpt".into(),
            timing_report: "max.rpt".into(),
            resolved_config: "resolved.json".into(),
        }
    }
}

impl FlowLayout {
    /// Layout with a different preferred corner.
    pub fn with_corner(mut self, corner: impl Into<String>) -> Self {
        self.preferred_corner = corner.into();
        self
    }

    pub fn synthesis_stats_path(&self, run: &Path) -> PathBuf {
        run.join(&self.synthesis_stage).join(&self.synthesis_stats)
    }

    pub fn signoff_stage_path(&self, run: &Path) -> PathBuf {
        run.join(&self.signoff_stage)
    }

    pub fn sta_stage_path(&self, run: &Path) -> PathBuf {
        run.join(&self.sta_stage)
    }

    pub fn resolved_config_path(&self, run: &Path) -> PathBuf {
        run.join(&self.resolved_config)
    }
}
