//! Informational summary values
//!
//! Values reported alongside the health outcomes but never judged:
//! firmware version, pool capacity and battery lifetime.

use crate::state::fields::{array, firmware, switch};
use crate::state::{Category, ContextState};
use tracing::warn;

/// Firmware version from the switch record or the firmware listing
pub fn firmware_version(state: &ContextState) -> Option<String> {
    if let Some(version) = state
        .record(Category::Switch)
        .and_then(|r| r.get(switch::FIRMWARE))
    {
        return Some(version.to_string());
    }
    let table = state.table(Category::Firmware)?;
    table
        .get(firmware::FOS_KEY)
        .or_else(|| table.iter().next().map(|(_, r)| r))
        .and_then(|r| r.get(firmware::PRIMARY))
        .map(str::to_string)
}

/// Convert a capacity like `557.861GB` to TiB
pub fn parse_capacity_tib(raw: &str) -> Option<f64> {
    const UNITS: &[(&str, f64)] = &[
        ("PB", 1024.0),
        ("TB", 1.0),
        ("GB", 1.0 / 1024.0),
        ("MB", 1.0 / (1024.0 * 1024.0)),
        ("KB", 1.0 / (1024.0 * 1024.0 * 1024.0)),
    ];
    let raw = raw.trim();
    UNITS.iter().find_map(|(unit, factor)| {
        raw.strip_suffix(unit)
            .and_then(|number| number.trim().parse::<f64>().ok())
            .map(|value| value * factor)
    })
}

/// Total and free storage-pool capacity in TiB
pub fn capacity_tib(state: &ContextState) -> Option<(f64, f64)> {
    let pools = state.table(Category::StoragePool)?;
    let mut total = 0.0;
    let mut free = 0.0;
    for (key, pool) in pools.iter() {
        let (Some(t), Some(f)) = (
            pool.get(array::TOTAL_CAPACITY),
            pool.get(array::FREE_CAPACITY),
        ) else {
            continue;
        };
        match (parse_capacity_tib(t), parse_capacity_tib(f)) {
            (Some(t), Some(f)) => {
                total += t;
                free += f;
            }
            _ => warn!(pool = key, total = t, free = f, "Unparseable pool capacity"),
        }
    }
    Some((total, free))
}

/// Remaining lifetime of every BBU, in listing order
pub fn bbu_lifetimes(state: &ContextState) -> Vec<String> {
    state
        .table(Category::BbuLife)
        .map(|table| {
            table
                .iter()
                .filter_map(|(_, r)| r.get(array::REMAINING_LIFETIME).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity_tib("1.000TB"), Some(1.0));
        assert_eq!(parse_capacity_tib("2PB"), Some(2048.0));
        assert_eq!(parse_capacity_tib("1024.000GB"), Some(1.0));
        assert_eq!(parse_capacity_tib("1048576KB"), Some(1.0 / 1024.0));
        assert_eq!(parse_capacity_tib("n/a"), None);
    }

    #[test]
    fn test_firmware_version_fallback() {
        let mut state = ContextState::default();
        assert_eq!(firmware_version(&state), None);

        let row: Record = [("Primary", "v8.2.1c"), ("Secondary", "v8.2.1c")]
            .into_iter()
            .collect();
        state.table_mut(Category::Firmware).merge_record("FOS", row);
        assert_eq!(firmware_version(&state).as_deref(), Some("v8.2.1c"));

        state
            .record_mut(Category::Switch)
            .insert("Firmware Version", "v9.1.0");
        assert_eq!(firmware_version(&state).as_deref(), Some("v9.1.0"));
    }

    #[test]
    fn test_capacity_skips_unparseable_pool() {
        let mut state = ContextState::default();
        let pools = state.table_mut(Category::StoragePool);
        pools.merge_record(
            "0",
            [("Total Capacity", "1.000TB"), ("Free Capacity", "256.000GB")]
                .into_iter()
                .collect(),
        );
        pools.merge_record(
            "1",
            [("Total Capacity", "--"), ("Free Capacity", "--")]
                .into_iter()
                .collect(),
        );

        assert_eq!(capacity_tib(&state), Some((1.0, 0.25)));
        assert!(bbu_lifetimes(&state).is_empty());
    }
}
