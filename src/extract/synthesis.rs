//! Synthesis statistics (`stat.json`).
//!
//! The document maps module names to their statistics:
//!
//! ```json
//! { "modules": { "\\top": { "area": 812.5, "num_cells_by_type": { "sky130_fd_sc_hd__buf_1": 4 } } } }
//! ```
//!
//! The format has no marker for the top-level module. The first module in the document is
//! reported; when a design keeps several modules after synthesis, that may not be the top.

use std::{collections::HashMap, fmt, path::Path};

use serde::{
    Deserialize, Deserializer,
    de::{IgnoredAny, MapAccess, Visitor},
};
use serde_json::value::RawValue;

use crate::{
    ExtractError,
    metrics::{Reported, SynthesisStats},
};

use super::read_report;

#[derive(Deserialize)]
struct StatDocument {
    #[serde(default)]
    modules: FirstModule,
}

#[derive(Deserialize)]
struct ModuleStats {
    area: Option<Box<RawValue>>,
    #[serde(default)]
    num_cells_by_type: HashMap<String, u64>,
}

/// First entry of the `modules` mapping, as it appears in the document.
#[derive(Default)]
struct FirstModule(Option<(String, ModuleStats)>);

impl<'de> Deserialize<'de> for FirstModule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FirstEntry;

        impl<'de> Visitor<'de> for FirstEntry {
            type Value = FirstModule;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of module statistics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FirstModule, A::Error> {
                let first = map.next_entry::<String, ModuleStats>()?;
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(FirstModule(first))
            }
        }

        deserializer.deserialize_map(FirstEntry)
    }
}

/// Parse the statistics of the first module in a `stat.json` document.
///
/// Returns `Ok(None)` when the document lists no module. The area is kept as written.
pub fn parse_synthesis_stats(input: &str) -> serde_json::Result<Option<SynthesisStats>> {
    let StatDocument {
        modules: FirstModule(first),
    } = serde_json::from_str(input)?;

    let Some((name, module)) = first else {
        return Ok(None);
    };

    Ok(Some(SynthesisStats {
        // Yosys escapes user identifiers with a leading backslash
        module: name.strip_prefix('\\').unwrap_or(&name).to_string(),
        area: module.area.and_then(Reported::from_raw),
        cell_count: module.num_cells_by_type.values().sum(),
    }))
}

/// Read and parse the synthesis statistics at `path`.
pub fn read_synthesis_stats(path: &Path) -> Result<SynthesisStats, ExtractError> {
    let input = read_report("synthesis statistics", path)?;

    parse_synthesis_stats(&input)
        .map_err(|source| ExtractError::Json {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ExtractError::NoModules {
            path: path.to_path_buf(),
        })
}
