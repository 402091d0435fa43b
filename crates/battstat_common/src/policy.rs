//! Which fields make it into the report.

use crate::parsers::RawRecord;
use std::collections::BTreeSet;

/// Fields never shown: too verbose, binary blobs, or internal bookkeeping.
pub const EXCLUDED_FIELDS: &[&str] = &[
    "AbsoluteCapacity",
    "AdapterDetails",
    "AppleRawAdapterDetails",
    "BatteryData",
    "BatteryInvalidWakeSeconds",
    "BootPathUpdated",
    "BootVoltage",
    "CarrierMode",
    "ChargerConfiguration",
    "ChargerData",
    "DeadBatteryBootData",
    "FedDetails",
    "FullPathUpdated",
    "IOGeneralInterest",
    "IOReportLegend",
    "IOReportLegendPublic",
    "KioskMode",
    "ManufacturerData",
    "PackReserve",
    "PortControllerInfo",
    "PowerTelemetryData",
    "UpdateTime",
    "UserVisiblePathUpdated",
];

/// Fields shown in the default (non-verbose) report.
pub const CURATED_FIELDS: &[&str] = &[
    "AppleRawCurrentCapacity",
    "AppleRawMaxCapacity",
    "Amperage",
    "AvgTimeToEmpty",
    "AvgTimeToFull",
    "BatteryInstalled",
    "CurrentCapacity",
    "CycleCount",
    "DesignCapacity",
    "DesignCycleCount9C",
    "ExternalConnected",
    "FullyCharged",
    "InstantAmperage",
    "IsCharging",
    "MaxCapacity",
    "NominalChargeCapacity",
    "Temperature",
    "TimeRemaining",
    "Voltage",
];

/// Curated subset or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Curated,
    All,
}

/// Field selection for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPolicy {
    mode: DisplayMode,
    excluded: BTreeSet<String>,
}

impl DisplayPolicy {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            excluded: EXCLUDED_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add user exclusions. The built-in set always stays excluded.
    pub fn with_exclusions<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Whether a field name passes the policy, independent of any record.
    pub fn allows(&self, field: &str) -> bool {
        if self.is_excluded(field) {
            return false;
        }
        match self.mode {
            DisplayMode::Curated => CURATED_FIELDS.contains(&field),
            DisplayMode::All => true,
        }
    }

    /// Record fields to display, in lexicographic order.
    pub fn select<'a>(&self, record: &'a RawRecord) -> Vec<(&'a str, &'a str)> {
        record.iter().filter(|(key, _)| self.allows(key)).collect()
    }
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self::new(DisplayMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("Voltage", "12568");
        record.insert("BatteryData", "{\"DesignCapacity\"=5103}");
        record.insert("Serial", "\"F8Y1234\"");
        record.insert("CycleCount", "212");
        record.insert("AbsoluteCapacity", "4312");
        record
    }

    #[test]
    fn test_curated_selection() {
        let record = sample_record();
        let policy = DisplayPolicy::new(DisplayMode::Curated);
        let keys: Vec<&str> = policy.select(&record).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["CycleCount", "Voltage"]);
    }

    #[test]
    fn test_all_selection_skips_excluded() {
        let record = sample_record();
        let policy = DisplayPolicy::new(DisplayMode::All);
        let keys: Vec<&str> = policy.select(&record).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["CycleCount", "Serial", "Voltage"]);
    }

    #[test]
    fn test_user_exclusions_add_to_builtin() {
        let record = sample_record();
        let policy = DisplayPolicy::new(DisplayMode::All).with_exclusions(["Serial"]);
        let keys: Vec<&str> = policy.select(&record).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["CycleCount", "Voltage"]);
        assert!(policy.is_excluded("BatteryData"));
    }

    #[test]
    fn test_excluded_wins_over_curated() {
        let policy = DisplayPolicy::default().with_exclusions(["Voltage"]);
        assert!(!policy.allows("Voltage"));
        assert!(policy.allows("CycleCount"));
    }

    #[test]
    fn test_empty_record_selects_nothing() {
        let policy = DisplayPolicy::new(DisplayMode::All);
        assert!(policy.select(&RawRecord::new()).is_empty());
    }

    #[test]
    fn test_curated_and_excluded_are_disjoint() {
        for field in CURATED_FIELDS {
            assert!(!EXCLUDED_FIELDS.contains(field), "{} is both curated and excluded", field);
        }
    }
}
