//! Maximum operating frequency.
//!
//! The shortest clock period the design would close at is the configured period minus the
//! worst setup slack. A positive slack shortens it, a negative slack (a violation) stretches
//! it, and the same formula covers both.
//!
//! ```text
//! min_period = clock_period - slack        [ns]
//! fmax       = 1000 / min_period           [MHz]
//! ```

use anyhow::Result;
use clap::Parser;

use crate::metrics::DerivedTiming;

/// Nanosecond periods to megahertz.
const NS_TO_MHZ: f64 = 1000.0;

impl DerivedTiming {
    /// Apply the formula to a known period and slack, both in nanoseconds.
    pub fn from_period_and_slack(clock_period: f64, slack: f64) -> Self {
        let min_period = clock_period - slack;

        if min_period > 0.0 {
            DerivedTiming::Defined {
                clock_period,
                min_period,
                fmax_mhz: NS_TO_MHZ / min_period,
            }
        } else {
            DerivedTiming::Undefined {
                clock_period,
                min_period,
            }
        }
    }
}

/// Derive the maximum frequency from a clock period and the slack text of a timing report.
///
/// Returns `None` when either input is missing or the slack is not a finite number; this is
/// "cannot compute", not an error.
///
/// # Example
///
/// ```
/// use flowmetrics::{DerivedTiming, derive_timing};
///
/// let derived = derive_timing(Some(10.0), Some("-3.0")).unwrap();
/// assert_eq!(derived.min_period(), 13.0);
///
/// assert!(derive_timing(Some(10.0), Some("n/a")).is_none());
/// assert!(matches!(
///     derive_timing(Some(5.0), Some("6.0")),
///     Some(DerivedTiming::Undefined { .. })
/// ));
/// ```
pub fn derive_timing(clock_period: Option<f64>, slack: Option<&str>) -> Option<DerivedTiming> {
    let clock_period = clock_period.filter(|p| p.is_finite())?;
    let slack = slack?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())?;

    Some(DerivedTiming::from_period_and_slack(clock_period, slack))
}

/// Command-line arguments for the fmax command.
#[derive(Parser, Debug)]
pub struct FmaxArgs {
    /// Clock period in nanoseconds
    #[clap(long, short)]
    pub period: f64,

    /// Worst setup slack in nanoseconds (negative when violated)
    #[clap(long, short, allow_hyphen_values = true)]
    pub slack: f64,
}

/// Print the minimum period and maximum frequency for a period and slack.
pub fn fmax_main(args: FmaxArgs) -> Result<()> {
    let FmaxArgs { period, slack } = args;

    match DerivedTiming::from_period_and_slack(period, slack) {
        DerivedTiming::Defined {
            min_period,
            fmax_mhz,
            ..
        } => {
            println!("Minimum Period: {} ns", min_period);
            println!("Max Frequency (Theoretical): {:.2} MHz", fmax_mhz);
        }
        DerivedTiming::Undefined { min_period, .. } => {
            println!("Minimum Period: {} ns", min_period);
            println!("Max Frequency: Undefined (Slack > Period?)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmax(period: f64, slack: &str) -> Option<DerivedTiming> {
        derive_timing(Some(period), Some(slack))
    }

    #[test]
    fn test_positive_slack() {
        let derived = fmax(10.0, "2.0").expect("Should derive");
        assert_eq!(derived.min_period(), 8.0);
        assert_eq!(format!("{:.2}", derived.fmax_mhz().unwrap()), "125.00");
    }

    #[test]
    fn test_negative_slack_penalises_frequency() {
        let derived = fmax(10.0, "-3.0").expect("Should derive");
        assert_eq!(derived.min_period(), 13.0);
        assert_eq!(format!("{:.2}", derived.fmax_mhz().unwrap()), "76.92");
    }

    #[test]
    fn test_slack_larger_than_period() {
        let derived = fmax(5.0, "6.0").expect("Should derive");
        assert_eq!(derived.min_period(), -1.0);
        assert_eq!(derived.fmax_mhz(), None);
        assert!(matches!(derived, DerivedTiming::Undefined { .. }));
    }

    #[test]
    fn test_zero_min_period_is_undefined() {
        let derived = fmax(4.0, "4.0").unwrap();
        assert!(matches!(derived, DerivedTiming::Undefined { min_period, .. } if min_period == 0.0));
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(derive_timing(None, Some("1.0")), None);
        assert_eq!(derive_timing(Some(10.0), None), None);
    }

    #[test]
    fn test_unparsable_slack_is_silent() {
        assert_eq!(fmax(10.0, "(MET)"), None);
        assert_eq!(fmax(10.0, ""), None);
        assert_eq!(fmax(10.0, "inf"), None);
        assert_eq!(fmax(10.0, "NaN"), None);
    }

    #[test]
    fn test_slack_text_is_trimmed() {
        let derived = fmax(20.0, " 11.947974 ").unwrap();
        assert!((derived.min_period() - 8.052026).abs() < 1e-9);
    }
}
