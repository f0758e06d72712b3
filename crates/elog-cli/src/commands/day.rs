//! Loading a day's log document and start conditions.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use elog_core::{
    ComplianceConfig, ComplianceResult, DutyStatusLog, LogDocument, RawStatus, RawTimestamp,
};

use crate::{Config, DayArgs};

/// A validated log plus the start conditions it is evaluated against.
#[derive(Debug, Clone)]
pub struct Day {
    pub log: DutyStatusLog,
    pub config: ComplianceConfig,
}

impl Day {
    /// Reads the document named by `args` and applies config and overrides.
    ///
    /// Precedence for start conditions: command-line flags, then the
    /// document's `options`, then the config file.
    pub fn load(config: &Config, args: &DayArgs) -> Result<Self> {
        let text = read_input(args.input.as_deref())?;
        Self::from_json(config, args, &text)
    }

    pub fn from_json(config: &Config, args: &DayArgs, text: &str) -> Result<Self> {
        let document: LogDocument =
            serde_json::from_str(text).context("failed to parse log document")?;
        let (data, mut options) = document.into_parts();

        config.fill_options(&mut options);
        if let Some(status) = args.start_status {
            options.start_status = Some(RawStatus::from(status));
        }
        if let Some(start_date) = &args.start_date {
            options.start_date = Some(RawTimestamp::Text(start_date.clone()));
        }

        let mut log = DutyStatusLog::from_entries(data);
        for event in &args.added {
            if !log.append(event) {
                tracing::warn!(?event, "ignoring malformed --add event");
            }
        }

        Ok(Self {
            log,
            config: ComplianceConfig::from_options(&options),
        })
    }

    pub fn evaluate(&self) -> ComplianceResult {
        elog_core::evaluate(&self.log, &self.config)
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read log document from stdin")?;
            Ok(text)
        }
    }
}
