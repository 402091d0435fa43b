//! Battery report rendering
//!
//! Layout:
//! - banner
//! - one `Field => value` line per selected field, sorted by name
//! - capacity health summary

use battstat_common::format::format_field;
use battstat_common::parsers::RawRecord;
use battstat_common::policy::DisplayPolicy;
use battstat_common::summary::{summary_line, CapacityHealth};
use battstat_common::ColorMode;
use owo_colors::OwoColorize;
use std::env;
use std::io::{self, IsTerminal, Write};

const RULE: &str = "-------------------------------";
const TITLE: &str = "         Battery Stats";
const NO_FIELDS: &str = "(no battery fields found)";
const NONE_SELECTED: &str = "(no fields selected)";

/// Terminal styling for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    pub color: bool,
}

impl ReportStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Resolve a color mode against the current stdout.
    pub fn detect(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                io::stdout().is_terminal()
                    && env::var_os("NO_COLOR").is_none()
                    && env::var("TERM").ok().as_deref() != Some("dumb")
            }
        };
        Self { color }
    }
}

/// Write the full report.
pub fn write_report<W: Write>(
    out: &mut W,
    record: &RawRecord,
    policy: &DisplayPolicy,
    style: ReportStyle,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    if style.color {
        writeln!(out, "{}", TITLE.bold())?;
    } else {
        writeln!(out, "{}", TITLE)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    let fields = policy.select(record);
    if fields.is_empty() {
        let marker = if record.is_empty() { NO_FIELDS } else { NONE_SELECTED };
        writeln!(out, "{}", marker)?;
    }
    for (key, raw) in fields {
        let value = format_field(key, raw);
        if style.color {
            writeln!(out, "{} => {}", key.cyan(), value)?;
        } else {
            writeln!(out, "{} => {}", key, value)?;
        }
    }

    writeln!(out)?;
    let health = CapacityHealth::from_record(record);
    writeln!(out, "{}", summary_line(health.as_ref()))?;
    Ok(())
}
