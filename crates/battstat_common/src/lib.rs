//! battstat common - registry collection, parsing and field formatting
//!
//! Pipeline: `collector` → `parsers` → `policy` + `format` → `summary`.
//! The CLI crate only wires these together and prints.

pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod parsers;
pub mod policy;
pub mod summary;

pub use collector::{load_dump, Collector, ProbeOutput, RegistrySource};
pub use config::{BattstatConfig, ColorMode};
pub use error::CollectError;
pub use format::{format_field, FieldRule};
pub use parsers::{parse_registry, LineShape, RawRecord};
pub use policy::{DisplayMode, DisplayPolicy};
pub use summary::{summary_line, CapacityHealth};
