//! Check command: a one-line verdict suitable for scripts.

use std::io::Write;

use anyhow::Result;
use elog_core::{ComplianceResult, DutyStatus, format_hours};

use crate::commands::day::Day;
use crate::{Config, DayArgs};

/// One-line verdict, e.g. `VIOLATION: 16:00 driving`.
pub fn format_verdict(result: &ComplianceResult) -> String {
    let driving = format_hours(result.totals_by_status.get(DutyStatus::Driving));
    if result.driving_violation {
        format!("VIOLATION: {driving} driving")
    } else {
        format!("ok: {driving} driving")
    }
}

/// Prints the verdict and returns whether the day ends in violation.
pub fn run<W: Write>(writer: &mut W, config: &Config, args: &DayArgs) -> Result<bool> {
    let day = Day::load(config, args)?;
    let result = day.evaluate();

    writeln!(writer, "{}", format_verdict(&result))?;
    Ok(result.driving_violation)
}

#[cfg(test)]
mod tests {
    use super::*;

    use elog_core::{ComplianceConfig, DutyStatusLog, evaluate};

    #[test]
    fn verdict_for_clean_day() {
        let result = evaluate(&DutyStatusLog::new(), &ComplianceConfig::default());
        assert_eq!(format_verdict(&result), "ok: 0:00 driving");
    }

    #[test]
    fn verdict_for_violation() {
        let config = ComplianceConfig {
            start_status: DutyStatus::Driving,
            ..ComplianceConfig::default()
        };
        let result = evaluate(&DutyStatusLog::new(), &config);
        assert_eq!(format_verdict(&result), "VIOLATION: 24:00 driving");
    }
}
