//! Run selection and report resolution.
//!
//! Stage directories are numbered, and the numbers move whenever the flow gains or loses a
//! step. Each report is therefore described by an ordered list of [`Candidate`]s: the
//! conventional location first, then directory scans. The first candidate that resolves wins.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use lazy_static::*;
use log::debug;
use regex::Regex;

use crate::layout::{DEFAULT_RUNS_DIR, FlowLayout};

lazy_static! {
    static ref RUN_RE: Regex = Regex::new(r"^RUN_").unwrap();
    static ref SIGNOFF_STAGE_RE: Regex = Regex::new(r"^7.*-").unwrap();
    static ref ANY_RE: Regex = Regex::new(r".*").unwrap();
}

/// One run of the flow, `<root>/RUN_<tag>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    path: PathBuf,
    name: String,
}

impl RunDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Which entry a directory scan keeps once the matches are sorted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Last,
}

/// How a directory scan selects entries by name.
#[derive(Debug, Clone)]
pub enum NameFilter {
    Matching(Regex),
    /// Plain substring, taken literally.
    Containing(String),
}

impl NameFilter {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            NameFilter::Matching(pattern) => pattern.is_match(name),
            NameFilter::Containing(needle) => name.contains(needle.as_str()),
        }
    }
}

/// A strategy for finding a directory.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// A fixed directory, accepted if it exists and holds `require` (when given).
    Exact {
        dir: PathBuf,
        require: Option<String>,
    },
    /// Subdirectories of `parent` accepted by `filter`, sorted by name.
    Scan {
        parent: PathBuf,
        filter: NameFilter,
        pick: Pick,
        require: Option<String>,
    },
}

impl Candidate {
    /// Resolve to an existing directory, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Candidate::Exact { dir, require } => {
                Some(dir.clone()).filter(|dir| holds(dir, require.as_deref()))
            }
            Candidate::Scan {
                parent,
                filter,
                pick,
                require,
            } => {
                let matches = subdirectories(parent)
                    .into_iter()
                    .filter(|name| filter.accepts(name))
                    .map(|name| parent.join(name))
                    .filter(|dir| holds(dir, require.as_deref()));

                match pick {
                    Pick::First => matches.min(),
                    Pick::Last => matches.max(),
                }
            }
        }
    }
}

/// Try each candidate in order and return the first directory that resolves.
pub fn first_existing(candidates: &[Candidate]) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        let found = candidate.resolve();
        debug!("candidate {:?} -> {:?}", candidate, found);
        found
    })
}

fn holds(dir: &Path, require: Option<&str>) -> bool {
    match require {
        Some(file) => dir.join(file).is_file(),
        None => dir.is_dir(),
    }
}

/// Names of the subdirectories of `parent`, sorted. A missing `parent` has none.
fn subdirectories(parent: &Path) -> Vec<String> {
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot list {}: {}", parent.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .sorted()
        .collect()
}

/// Find the most recent run under `root`.
///
/// Runs are named `RUN_<tag>` with a sortable tag, so the lexicographically greatest name is
/// the latest one. An empty or missing `root` yields `None`.
///
/// # Example
///
/// ```no_run
/// use flowmetrics::find_latest_run;
/// use std::path::Path;
///
/// match find_latest_run(Path::new("runs")) {
///     Some(run) => println!("latest run: {}", run.name()),
///     None => println!("no runs yet"),
/// }
/// ```
pub fn find_latest_run(root: &Path) -> Option<RunDirectory> {
    subdirectories(root)
        .into_iter()
        .filter(|name| RUN_RE.is_match(name))
        .last()
        .map(|name| RunDirectory::new(root.join(name)))
}

/// Locate the state document of the final signoff stage.
///
/// The manufacturability stage is tried first. Otherwise the last `7*-*` stage holding a
/// state document is used.
pub fn locate_signoff_state(run: &Path, layout: &FlowLayout) -> Option<PathBuf> {
    let candidates = [
        Candidate::Exact {
            dir: layout.signoff_stage_path(run),
            require: Some(layout.state_file.clone()),
        },
        Candidate::Scan {
            parent: run.to_path_buf(),
            filter: NameFilter::Matching(SIGNOFF_STAGE_RE.clone()),
            pick: Pick::Last,
            require: Some(layout.state_file.clone()),
        },
    ];

    first_existing(&candidates).map(|dir| dir.join(&layout.state_file))
}

/// The analysis corner power and timing are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corner {
    /// Corner name, as shown in the report headings.
    pub name: String,
    /// Resolved corner directory; `None` when the STA stage has no corner at all.
    pub dir: Option<PathBuf>,
    /// The STA stage directory that was searched.
    pub stage: PathBuf,
}

/// Choose the corner directory of the post-PnR STA stage.
///
/// The preferred corner is used when it holds a power report. Otherwise the first corner
/// whose name contains the nominal hint wins, then simply the first corner. The corner found
/// here is shared by the power and timing parsers.
pub fn resolve_corner(run: &Path, layout: &FlowLayout) -> Corner {
    let stage = layout.sta_stage_path(run);
    let candidates = [
        Candidate::Exact {
            dir: stage.join(&layout.preferred_corner),
            require: Some(layout.power_report.clone()),
        },
        Candidate::Scan {
            parent: stage.clone(),
            filter: NameFilter::Containing(layout.corner_hint.clone()),
            pick: Pick::First,
            require: None,
        },
        Candidate::Scan {
            parent: stage.clone(),
            filter: NameFilter::Matching(ANY_RE.clone()),
            pick: Pick::First,
            require: None,
        },
    ];

    match first_existing(&candidates) {
        Some(dir) => Corner {
            name: dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| layout.preferred_corner.clone()),
            dir: Some(dir),
            stage,
        },
        None => Corner {
            name: layout.preferred_corner.clone(),
            dir: None,
            stage,
        },
    }
}

/// Command-line arguments for the latest command.
#[derive(Parser, Debug)]
pub struct LatestArgs {
    /// Directory holding the RUN_* directories
    #[clap(long, default_value = DEFAULT_RUNS_DIR)]
    pub runs_dir: PathBuf,
}

/// Print the path of the most recent run.
pub fn latest_main(args: LatestArgs) -> Result<()> {
    match find_latest_run(&args.runs_dir) {
        Some(run) => println!("{}", run.path().display()),
        None => println!("No runs found in {}", args.runs_dir.display()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).expect("Failed to create directory");
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create directory");
        fs::write(path, "{}").expect("Failed to write file");
    }

    #[test]
    fn test_latest_run_is_greatest_name() {
        let root = TempDir::new().unwrap();
        mkdirs(
            root.path(),
            &[
                "RUN_2024-05-01_10-00-00",
                "RUN_2024-05-03_09-00-00",
                "RUN_2024-05-02_23-59-59",
            ],
        );

        let run = find_latest_run(root.path()).expect("Should find a run");
        assert_eq!(run.name(), "RUN_2024-05-03_09-00-00");
        assert_eq!(run.path(), root.path().join("RUN_2024-05-03_09-00-00"));
    }

    #[test]
    fn test_latest_run_ignores_other_entries() {
        let root = TempDir::new().unwrap();
        mkdirs(root.path(), &["RUN_A", "RUN_B", "scratch", "ZZZ"]);
        touch(&root.path().join("RUN_Z"));

        let run = find_latest_run(root.path()).expect("Should find a run");
        assert_eq!(run.name(), "RUN_B");
    }

    #[test]
    fn test_no_runs() {
        let root = TempDir::new().unwrap();
        assert!(find_latest_run(root.path()).is_none());
        assert!(find_latest_run(&root.path().join("missing")).is_none());
    }

    #[test]
    fn test_signoff_state_prefers_canonical_stage() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();
        touch(&run.path().join("74-misc-reportmanufacturability/state_out.json"));
        touch(&run.path().join("78-checker-lvs/state_out.json"));

        let found = locate_signoff_state(run.path(), &layout).expect("Should locate state");
        assert_eq!(
            found,
            run.path().join("74-misc-reportmanufacturability/state_out.json")
        );
    }

    #[test]
    fn test_signoff_state_falls_back_to_last_stage() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();
        touch(&run.path().join("70-odb-reportwirelength/state_out.json"));
        touch(&run.path().join("73-checker-xor/state_out.json"));
        touch(&run.path().join("54-openroad-stapostpnr/state_out.json"));
        // Later stage without a state document does not count
        mkdirs(run.path(), &["79-klayout-drc"]);

        let found = locate_signoff_state(run.path(), &layout).expect("Should locate state");
        assert_eq!(found, run.path().join("73-checker-xor/state_out.json"));
    }

    #[test]
    fn test_signoff_state_missing() {
        let run = TempDir::new().unwrap();
        touch(&run.path().join("54-openroad-stapostpnr/state_out.json"));
        assert!(locate_signoff_state(run.path(), &FlowLayout::default()).is_none());
    }

    #[test]
    fn test_corner_preferred() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();
        touch(&run.path().join("54-openroad-stapostpnr/max_ss_100C_1v60/power.rpt"));
        touch(&run.path().join("54-openroad-stapostpnr/nom_tt_025C_1v80/power.rpt"));

        let corner = resolve_corner(run.path(), &layout);
        assert_eq!(corner.name, "nom_tt_025C_1v80");
        assert_eq!(
            corner.dir,
            Some(run.path().join("54-openroad-stapostpnr/nom_tt_025C_1v80"))
        );
    }

    #[test]
    fn test_corner_prefers_nominal_hint() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();
        mkdirs(
            run.path(),
            &[
                "54-openroad-stapostpnr/max_ff_n40C_1v95",
                "54-openroad-stapostpnr/nom_tt_025C_1v65",
            ],
        );

        let corner = resolve_corner(run.path(), &layout);
        assert_eq!(corner.name, "nom_tt_025C_1v65");
    }

    #[test]
    fn test_corner_hint_is_literal() {
        let run = TempDir::new().unwrap();
        let mut layout = FlowLayout::default();
        layout.corner_hint = "tt.0(".into();
        mkdirs(
            run.path(),
            &[
                "54-openroad-stapostpnr/max_ttX0(_1v60",
                "54-openroad-stapostpnr/nom_tt.0(_1v80",
            ],
        );

        let corner = resolve_corner(run.path(), &layout);
        assert_eq!(corner.name, "nom_tt.0(_1v80");
    }

    #[test]
    fn test_corner_falls_back_to_first() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();
        mkdirs(
            run.path(),
            &[
                "54-openroad-stapostpnr/min_ss_100C_1v60",
                "54-openroad-stapostpnr/max_ff_n40C_1v95",
            ],
        );
        touch(&run.path().join("54-openroad-stapostpnr/summary.rpt"));

        let corner = resolve_corner(run.path(), &layout);
        assert_eq!(corner.name, "max_ff_n40C_1v95");
    }

    #[test]
    fn test_corner_unresolved() {
        let run = TempDir::new().unwrap();
        let layout = FlowLayout::default();

        let corner = resolve_corner(run.path(), &layout);
        assert_eq!(corner.name, "nom_tt_025C_1v80");
        assert!(corner.dir.is_none());
        assert_eq!(corner.stage, run.path().join("54-openroad-stapostpnr"));
    }

    #[test]
    fn test_candidates_tried_in_order() {
        let root = TempDir::new().unwrap();
        mkdirs(root.path(), &["b", "c"]);

        let candidates = [
            Candidate::Exact {
                dir: root.path().join("a"),
                require: None,
            },
            Candidate::Scan {
                parent: root.path().to_path_buf(),
                filter: NameFilter::Matching(ANY_RE.clone()),
                pick: Pick::Last,
                require: None,
            },
            Candidate::Exact {
                dir: root.path().join("b"),
                require: None,
            },
        ];

        assert_eq!(first_existing(&candidates), Some(root.path().join("c")));
    }
}
