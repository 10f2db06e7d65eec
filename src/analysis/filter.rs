//! Sidebar filters.
//!
//! A selection is four independent equality predicates combined with AND.
//! Null cells are never offered as options and never match a chosen value,
//! but they do not hide a row while their column is unconstrained.

use crate::logging::{self, LogSource};
use crate::model::{
    Choice, FilterSelection, SENTINEL_ALL, SENTINEL_ALL_PERIODS, ShipmentRecord, ShipmentTable,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Whether a record satisfies every constrained dimension of `selection`.
pub fn matches(record: &ShipmentRecord, selection: &FilterSelection) -> bool {
    selection.loading_site.matches(record.loading_site.as_deref())
        && selection.carrier.matches(record.carrier.as_deref())
        && selection.period.matches(record.period.as_deref())
        && selection.transport_type.matches(record.transport_type.as_deref())
}

/// Returns a fresh table holding the rows that match `selection`, in their
/// original order. The source table is left untouched.
pub fn apply_filter(table: &ShipmentTable, selection: &FilterSelection) -> ShipmentTable {
    if selection.is_unconstrained() {
        return table.clone();
    }

    let records: Vec<ShipmentRecord> = table
        .records
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect();

    logging::debug(
        LogSource::Filter,
        None,
        &format!("{}: {} of {} rows", selection.describe(), records.len(), table.len()),
    );
    ShipmentTable::new(table.columns.clone(), records)
}

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

/// Selectbox contents for each dimension: the sentinel label first, then the
/// distinct non-null values in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub loading_sites: Vec<String>,
    pub carriers: Vec<String>,
    pub periods: Vec<String>,
    pub transport_types: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &ShipmentTable) -> Self {
        FilterOptions {
            loading_sites: options(table, SENTINEL_ALL, |r| r.loading_site.as_deref()),
            carriers: options(table, SENTINEL_ALL, |r| r.carrier.as_deref()),
            periods: options(table, SENTINEL_ALL_PERIODS, |r| r.period.as_deref()),
            transport_types: options(table, SENTINEL_ALL, |r| r.transport_type.as_deref()),
        }
    }
}

fn options<F>(table: &ShipmentTable, sentinel: &str, field: F) -> Vec<String>
where
    F: Fn(&ShipmentRecord) -> Option<&str>,
{
    let distinct: BTreeSet<&str> = table.records.iter().filter_map(field).collect();
    std::iter::once(sentinel)
        .chain(distinct)
        .map(String::from)
        .collect()
}

/// Maps four selectbox labels back to a selection.
pub fn selection_from_labels(
    loading_site: &str,
    carrier: &str,
    period: &str,
    transport_type: &str,
) -> FilterSelection {
    FilterSelection {
        loading_site: Choice::from_label(loading_site, SENTINEL_ALL),
        carrier: Choice::from_label(carrier, SENTINEL_ALL),
        period: Choice::from_label(period, SENTINEL_ALL_PERIODS),
        transport_type: Choice::from_label(transport_type, SENTINEL_ALL),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
