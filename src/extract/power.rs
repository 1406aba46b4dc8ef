//! Power breakdown from an OpenROAD `power.rpt`.
//!
//! ```text
//! Group                  Internal  Switching    Leakage      Total
//!                           Power      Power      Power      Power (Watts)
//! ----------------------------------------------------------------
//! Sequential             1.20e-04   1.31e-05   1.02e-09   1.33e-04  38.9%
//! Combinational          8.56e-05   1.23e-04   2.98e-09   2.09e-04  61.1%
//! ----------------------------------------------------------------
//! Total                  2.06e-04   1.36e-04   4.00e-09   3.42e-04 100.0%
//! ```
//!
//! Values are kept as the report prints them; no unit conversion is applied.

use crate::{ExtractError, locate::Corner, metrics::PowerBreakdown};

use super::{corner_file, read_report};

/// Parse the first `Total` row with at least five fields.
pub fn parse_power_report(input: &str) -> Option<PowerBreakdown> {
    input.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["Total", internal, switching, leakage, total, ..] => Some(PowerBreakdown {
                internal: internal.to_string(),
                switching: switching.to_string(),
                leakage: leakage.to_string(),
                total: total.to_string(),
            }),
            _ => None,
        }
    })
}

/// Read the power report `file` of the resolved corner.
pub fn read_power_report(corner: &Corner, file: &str) -> Result<PowerBreakdown, ExtractError> {
    let path = corner_file(corner, file)?;
    let input = read_report("power report", &path)?;

    parse_power_report(&input).ok_or(ExtractError::NoTotalLine { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_total_row_verbatim() {
        let power = parse_power_report("Total 1.1e-3 2.2e-3 3.3e-3 6.6e-3 100%")
            .expect("Should find the Total row");

        assert_eq!(power.internal, "1.1e-3");
        assert_eq!(power.switching, "2.2e-3");
        assert_eq!(power.leakage, "3.3e-3");
        assert_eq!(power.total, "6.6e-3");
    }

    #[test]
    fn test_full_report() {
        let input = "\
Group                  Internal  Switching    Leakage      Total
                          Power      Power      Power      Power (Watts)
----------------------------------------------------------------
Sequential             1.20e-04   1.31e-05   1.02e-09   1.33e-04  38.9%
Combinational          8.56e-05   1.23e-04   2.98e-09   2.09e-04  61.1%
Macro                  0.00e+00   0.00e+00   0.00e+00   0.00e+00   0.0%
Pad                    0.00e+00   0.00e+00   0.00e+00   0.00e+00   0.0%
----------------------------------------------------------------
Total                  2.06e-04   1.36e-04   4.00e-09   3.42e-04 100.0%
                          60.2%      39.8%       0.0%
";
        let power = parse_power_report(input).expect("Should find the Total row");
        assert_eq!(power.internal, "2.06e-04");
        assert_eq!(power.total, "3.42e-04");
    }

    #[test]
    fn test_first_total_row_wins() {
        let input = "  Total 1 2 3 4 100%\nTotal 5 6 7 8 100%\n";
        let power = parse_power_report(input).unwrap();
        assert_eq!(power.internal, "1");
        assert_eq!(power.total, "4");
    }

    #[test]
    fn test_short_total_row_skipped() {
        let input = "Total Power\nTotal 0.5 0.25 0.125 0.875\n";
        let power = parse_power_report(input).expect("Five-field row should match");
        assert_eq!(power.internal, "0.5");
        assert_eq!(power.total, "0.875");
    }

    #[test]
    fn test_total_must_be_whole_token() {
        assert_eq!(parse_power_report("Totals 1 2 3 4 5\n"), None);
        assert_eq!(parse_power_report("Group Internal Switching Leakage Total\n"), None);
    }

    #[test]
    fn test_unresolved_corner() {
        let corner = Corner {
            name: "nom_tt_025C_1v80".into(),
            dir: None,
            stage: PathBuf::from("run/54-openroad-stapostpnr"),
        };
        let err = read_power_report(&corner, "power.rpt").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_no_total_row_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("power.rpt"), "Group Internal\n").unwrap();
        let corner = Corner {
            name: "nom".into(),
            dir: Some(dir.path().to_path_buf()),
            stage: dir.path().to_path_buf(),
        };

        let err = read_power_report(&corner, "power.rpt").unwrap_err();
        assert!(matches!(err, ExtractError::NoTotalLine { .. }));
    }
}
