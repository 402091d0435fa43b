//! Capacity health: present full-charge capacity as a share of design capacity.

use crate::parsers::{design_capacity, parse_unsigned, RawRecord};
use tracing::debug;

/// Field holding the battery's present full-charge capacity in mAh.
pub const NOMINAL_CAPACITY_KEY: &str = "NominalChargeCapacity";

/// Derived capacity health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityHealth {
    pub design_mah: u64,
    pub nominal_mah: u64,
    pub percent: f64,
}

impl CapacityHealth {
    /// Compute from two capacities. `None` when the design capacity is zero.
    pub fn from_capacities(nominal_mah: u64, design_mah: u64) -> Option<Self> {
        if design_mah == 0 {
            return None;
        }
        let percent = (nominal_mah as f64 / design_mah as f64) * 100.0;
        Some(Self {
            design_mah,
            nominal_mah,
            percent,
        })
    }

    /// Compute from a parsed record. `None` if either input is missing or malformed.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let Some(design_mah) = design_capacity(record) else {
            debug!("design capacity not found");
            return None;
        };

        let nominal_mah = match record.get(NOMINAL_CAPACITY_KEY).map(parse_unsigned) {
            Some(Ok(v)) => v,
            Some(Err(reason)) => {
                debug!(%reason, "nominal capacity is not an integer");
                return None;
            }
            None => {
                debug!("nominal capacity not found");
                return None;
            }
        };

        Self::from_capacities(nominal_mah, design_mah)
    }
}

/// Summary line for the report.
pub fn summary_line(health: Option<&CapacityHealth>) -> String {
    match health {
        Some(h) => format!(
            "Battery capacity is currently {:.2}% of original.",
            h.percent
        ),
        None => "Could not determine battery capacity.".to_string(),
    }
}
