//! Parsers for battery registry output.
//!
//! - `registry`: `ioreg` property lines → `RawRecord`
//! - `atoms`: integer parsing shared by the field rules
//!
//! Parsing never fails as a whole. Lines that do not match are skipped and
//! numeric problems are reported per field.

pub mod atoms;
pub mod registry;

pub use atoms::{
    fixed_point, parse_signed, parse_twos_complement, parse_unsigned, ParseError,
    ParseErrorReason,
};
pub use registry::{
    design_capacity, parse_registry, LineShape, RawRecord, BATTERY_DATA_KEY, DESIGN_CAPACITY_KEY,
};
