//! Field rendering rules.
//!
//! Each field gets exactly one `FieldRule`, chosen by walking `RULE_TABLE`
//! in order. Numeric rules that cannot parse their input fall back to
//! `FieldRule::Verbatim` for that field only.

use crate::parsers::atoms::{fixed_point, parse_signed, parse_twos_complement, parse_unsigned};
use crate::parsers::{ParseError, ParseErrorReason};
use tracing::debug;

/// Fields carrying instantaneous current draw.
pub const CURRENT_FIELDS: &[&str] = &["Amperage", "InstantAmperage"];

/// Capacity fields reported as a percentage rather than mAh.
pub const PERCENT_CAPACITY_FIELDS: &[&str] = &["CurrentCapacity", "MaxCapacity", "AbsoluteCapacity"];

/// Time estimates reported in minutes.
pub const MINUTE_FIELDS: &[&str] = &["TimeRemaining", "AvgTimeToEmpty", "AvgTimeToFull"];

/// Minutes value the firmware uses when no estimate is available.
pub const MINUTES_NOT_APPLICABLE: u64 = 65535;

/// Display text for `MINUTES_NOT_APPLICABLE`.
pub const NOT_APPLICABLE_TEXT: &str = "Not Charging";

/// Rendering rule for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Signed milliamps, 64-bit two's complement
    SignedCurrent,
    /// Millivolts → volts
    Voltage,
    /// Centi-degrees → °C
    Temperature,
    /// Percent or mAh depending on the field
    Capacity,
    /// Duration in seconds
    Seconds,
    /// Duration in minutes with the 65535 sentinel
    Minutes,
    /// Unquoted, unbraced raw text
    Verbatim,
}

/// Name predicate used by the rule table.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    OneOf(&'static [&'static str]),
    Contains(&'static str),
    EndsWith(&'static str),
}

impl Matcher {
    fn matches(&self, field: &str) -> bool {
        match self {
            Matcher::OneOf(names) => names.contains(&field),
            Matcher::Contains(part) => field.contains(part),
            Matcher::EndsWith(suffix) => field.ends_with(suffix),
        }
    }
}

/// Priority-ordered rule table. First match wins.
const RULE_TABLE: &[(Matcher, FieldRule)] = &[
    (Matcher::OneOf(CURRENT_FIELDS), FieldRule::SignedCurrent),
    (Matcher::Contains("Voltage"), FieldRule::Voltage),
    (Matcher::Contains("Temperature"), FieldRule::Temperature),
    (Matcher::Contains("Capacity"), FieldRule::Capacity),
    (Matcher::EndsWith("Seconds"), FieldRule::Seconds),
    (Matcher::OneOf(MINUTE_FIELDS), FieldRule::Minutes),
];

impl FieldRule {
    /// Pick the rule for a field name.
    pub fn for_field(field: &str) -> Self {
        RULE_TABLE
            .iter()
            .find(|(matcher, _)| matcher.matches(field))
            .map(|(_, rule)| *rule)
            .unwrap_or(FieldRule::Verbatim)
    }

    /// Render a raw value under this rule.
    pub fn render(self, field: &str, raw: &str) -> Result<String, ParseError> {
        let err = |reason: ParseErrorReason| ParseError::new(field, raw, reason);

        match self {
            FieldRule::SignedCurrent => {
                let milliamps = parse_twos_complement(raw).map_err(err)?;
                Ok(format!("{} mA", milliamps))
            }
            FieldRule::Voltage => {
                let millivolts = parse_signed(raw).map_err(err)?;
                Ok(format!("{} V", fixed_point(millivolts, 3)))
            }
            FieldRule::Temperature => {
                let centi = parse_signed(raw).map_err(err)?;
                Ok(format!("{} °C", fixed_point(centi, 2)))
            }
            FieldRule::Capacity => {
                let value = parse_unsigned(raw).map_err(err)?;
                if PERCENT_CAPACITY_FIELDS.contains(&field) {
                    Ok(format!("{} %", value))
                } else {
                    Ok(format!("{} mAh", value))
                }
            }
            FieldRule::Seconds => {
                let seconds = parse_unsigned(raw).map_err(err)?;
                Ok(format_seconds(seconds))
            }
            FieldRule::Minutes => {
                let minutes = parse_unsigned(raw).map_err(err)?;
                Ok(format_minutes(minutes))
            }
            FieldRule::Verbatim => Ok(strip_wrapping(raw).to_string()),
        }
    }
}

/// Render one field for display.
///
/// A value the chosen rule cannot parse is shown verbatim.
pub fn format_field(field: &str, raw: &str) -> String {
    let rule = FieldRule::for_field(field);
    match rule.render(field, raw) {
        Ok(text) => text,
        Err(e) => {
            debug!(?rule, error = %e, "falling back to verbatim rendering");
            strip_wrapping(raw).to_string()
        }
    }
}

/// `125` → `2m 5s`, `45` → `45s`.
pub fn format_seconds(seconds: u64) -> String {
    if seconds >= 60 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// `125` → `2h 5m`, `0` → `0m`, `65535` → `Not Charging`.
pub fn format_minutes(minutes: u64) -> String {
    match minutes {
        MINUTES_NOT_APPLICABLE => NOT_APPLICABLE_TEXT.to_string(),
        0 => "0m".to_string(),
        m => format!("{}h {}m", m / 60, m % 60),
    }
}

/// Strip one layer of surrounding quotes, then one layer of braces.
///
/// Each delimiter is removed independently at either end.
pub fn strip_wrapping(raw: &str) -> &str {
    let s = raw.strip_prefix('"').unwrap_or(raw);
    let s = s.strip_suffix('"').unwrap_or(s);
    let s = s.strip_prefix('{').unwrap_or(s);
    s.strip_suffix('}').unwrap_or(s)
}
