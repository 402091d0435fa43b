//! Parser for `ioreg` property dumps.
//!
//! Turns the property lines of an AppleSmartBattery node into a `RawRecord`.
//! Values are kept as raw text; unit handling lives in `format`.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

lazy_static! {
    /// `"Key" = value` anywhere on a line (`ioreg -r -c` output).
    static ref REGISTRY_PROPERTY: Regex = Regex::new(r#""([^"]+)" = ([^\n]+)"#)
        .expect("registry property pattern is valid");

    /// `"Key" = value` behind tree-drawing prefix only (`ioreg -l` output).
    static ref TREE_PROPERTY: Regex = Regex::new(r#"(?m)^[ \t|]*"([^"]+)" = (.+)$"#)
        .expect("tree property pattern is valid");

    /// `"DesignCapacity"=<int>` inside the nested BatteryData dictionary.
    static ref NESTED_DESIGN_CAPACITY: Regex = Regex::new(r#""DesignCapacity"=(\d+)"#)
        .expect("nested design capacity pattern is valid");
}

/// Field holding the nested battery data dictionary.
pub const BATTERY_DATA_KEY: &str = "BatteryData";

/// Top-level design capacity published by older machines.
pub const DESIGN_CAPACITY_KEY: &str = "DesignCapacity";

/// Line shape expected in the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    /// Quoted key followed by ` = ` anywhere in a line
    Registry,
    /// Quoted key preceded only by whitespace and `|` tree guides
    Tree,
}

/// Field name → raw value, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. A later value for the same key replaces the earlier one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(previous) = self.fields.insert(key.clone(), value) {
            debug!(field = %key, previous = %previous, "duplicate field overwritten");
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Parse an `ioreg` dump into a `RawRecord`.
///
/// Lines that do not look like properties are ignored; a dump without any
/// property lines produces an empty record.
pub fn parse_registry(raw: &str, shape: LineShape) -> RawRecord {
    let pattern: &Regex = match shape {
        LineShape::Registry => &*REGISTRY_PROPERTY,
        LineShape::Tree => &*TREE_PROPERTY,
    };

    let mut record = RawRecord::new();
    for caps in pattern.captures_iter(raw) {
        let key = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str().trim());
        record.insert(key, value);
    }

    debug!(fields = record.len(), ?shape, "parsed registry dump");
    record
}

/// Design capacity in mAh.
///
/// Read from the `BatteryData` dictionary first, then from a top-level
/// `DesignCapacity` field.
pub fn design_capacity(record: &RawRecord) -> Option<u64> {
    let nested = record
        .get(BATTERY_DATA_KEY)
        .and_then(|data| NESTED_DESIGN_CAPACITY.captures(data))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    nested.or_else(|| {
        record
            .get(DESIGN_CAPACITY_KEY)
            .and_then(|v| v.trim().parse().ok())
    })
}
