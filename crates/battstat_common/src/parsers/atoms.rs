//! Atomic numeric parsing for registry values.
//!
//! ioreg prints integers in base 10. Negative quantities (discharge current)
//! appear as the unsigned 64-bit bit pattern of the signed value.

use thiserror::Error;

/// Numeric parse failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {field}: cannot parse {raw:?} ({reason})")]
pub struct ParseError {
    /// Field whose value failed to parse
    pub field: String,
    /// Raw value as it appeared in the registry dump
    pub raw: String,
    /// Why parsing failed
    pub reason: ParseErrorReason,
}

/// Specific reason for parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorReason {
    /// No digits found in input
    #[error("empty number")]
    EmptyNumber,
    /// Input was negative where only unsigned values make sense
    #[error("negative value")]
    NegativeValue,
    /// Non-numeric characters in numeric field
    #[error("invalid number")]
    InvalidNumber,
    /// Result exceeds the 64-bit range
    #[error("overflow")]
    Overflow,
}

impl ParseError {
    pub fn new(field: &str, raw: &str, reason: ParseErrorReason) -> Self {
        Self {
            field: field.to_string(),
            raw: raw.to_string(),
            reason,
        }
    }
}

/// Parse an unsigned base-10 integer.
pub fn parse_unsigned(s: &str) -> Result<u64, ParseErrorReason> {
    let s = s.trim();

    if s.is_empty() {
        return Err(ParseErrorReason::EmptyNumber);
    }
    if s.starts_with('-') {
        return Err(ParseErrorReason::NegativeValue);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorReason::InvalidNumber);
    }

    s.parse().map_err(|_| ParseErrorReason::Overflow)
}

/// Parse a signed base-10 integer, allowing a leading `-`.
pub fn parse_signed(s: &str) -> Result<i64, ParseErrorReason> {
    let s = s.trim();

    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() {
        return Err(ParseErrorReason::EmptyNumber);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorReason::InvalidNumber);
    }

    s.parse().map_err(|_| ParseErrorReason::Overflow)
}

/// Parse a value that may be the unsigned encoding of a signed 64-bit integer.
///
/// `18446744073709551615` → `-1`. Decimal input that is already negative is
/// returned unchanged.
pub fn parse_twos_complement(s: &str) -> Result<i64, ParseErrorReason> {
    match parse_unsigned(s) {
        Ok(raw) => Ok(raw as i64),
        Err(ParseErrorReason::NegativeValue) => parse_signed(s),
        Err(e) => Err(e),
    }
}

/// Render `value / 10^digits` with exactly `digits` decimals, no floats.
pub fn fixed_point(value: i64, digits: u32) -> String {
    let scale = 10u64.pow(digits);
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        magnitude / scale,
        magnitude % scale,
        width = digits as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_parse_unsigned() {
        assert_eq!(parse_unsigned("0"), Ok(0));
        assert_eq!(parse_unsigned("  8921 "), Ok(8921));
        assert_eq!(parse_unsigned("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn golden_parse_unsigned_errors() {
        assert_eq!(parse_unsigned(""), Err(ParseErrorReason::EmptyNumber));
        assert_eq!(parse_unsigned("-5"), Err(ParseErrorReason::NegativeValue));
        assert_eq!(parse_unsigned("Yes"), Err(ParseErrorReason::InvalidNumber));
        assert_eq!(parse_unsigned("+5"), Err(ParseErrorReason::InvalidNumber));
        assert_eq!(
            parse_unsigned("18446744073709551616"),
            Err(ParseErrorReason::Overflow)
        );
    }

    #[test]
    fn golden_parse_signed() {
        assert_eq!(parse_signed("-250"), Ok(-250));
        assert_eq!(parse_signed("250"), Ok(250));
        assert_eq!(parse_signed("-"), Err(ParseErrorReason::EmptyNumber));
        assert_eq!(parse_signed("1.5"), Err(ParseErrorReason::InvalidNumber));
    }

    #[test]
    fn golden_parse_twos_complement() {
        assert_eq!(parse_twos_complement("18446744073709551615"), Ok(-1));
        assert_eq!(parse_twos_complement("18446744073709550616"), Ok(-1000));
        assert_eq!(parse_twos_complement("1500"), Ok(1500));
        assert_eq!(parse_twos_complement("-42"), Ok(-42));
        assert_eq!(
            parse_twos_complement("{}"),
            Err(ParseErrorReason::InvalidNumber)
        );
    }

    #[test]
    fn golden_fixed_point() {
        assert_eq!(fixed_point(12568, 3), "12.568");
        assert_eq!(fixed_point(12000, 3), "12.000");
        assert_eq!(fixed_point(7, 3), "0.007");
        assert_eq!(fixed_point(3055, 2), "30.55");
        assert_eq!(fixed_point(-150, 2), "-1.50");
        assert_eq!(fixed_point(-5, 2), "-0.05");
    }
}
