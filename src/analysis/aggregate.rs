//! KPI sums and group-by-mean views.
//!
//! Each chart of the dashboard is one reduction over the filtered table:
//!   - bar chart: mean DZD/t.km per wilaya,
//!   - trend line: mean DZD/t.km per period, in label order,
//!   - map: the bar chart means placed on `regions::REGION_REGISTRY`.
//!
//! Rows whose metric is undefined (zero quantity or zero distance) are left
//! out of every mean; a single such row would otherwise turn a whole group's
//! average into inf or NaN.

use crate::logging;
use crate::model::{ShipmentRecord, ShipmentTable};
use crate::regions::{self, RegionCoordinate};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Scalar summaries
// ---------------------------------------------------------------------------

/// The three headline numbers plus the row count behind them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub row_count: usize,
    /// Sum of billed quantity, tonnes.
    pub total_quantity_t: f64,
    pub total_distance_km: f64,
    /// Sum of cost, DZD.
    pub total_cost: f64,
}

impl Summary {
    /// Sums each numeric column. Missing (NaN) cells are skipped, as a
    /// dataframe `sum()` would; an empty table sums to zero.
    pub fn of(table: &ShipmentTable) -> Self {
        let sum = |field: fn(&ShipmentRecord) -> f64| -> f64 {
            table
                .records
                .iter()
                .map(field)
                .filter(|v| !v.is_nan())
                .sum()
        };

        Summary {
            row_count: table.len(),
            total_quantity_t: sum(|r| r.billed_quantity),
            total_distance_km: sum(|r| r.distance_km),
            total_cost: sum(|r| r.cost),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Column the DZD/t.km means are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKey {
    Region,
    Period,
}

impl GroupKey {
    fn value<'a>(&self, record: &'a ShipmentRecord) -> Option<&'a str> {
        match self {
            GroupKey::Region => record.region.as_deref(),
            GroupKey::Period => record.period.as_deref(),
        }
    }
}

/// Mean of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    /// Rows that contributed to the mean.
    pub rows: usize,
}

/// Result of a group-by-mean: groups in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedMeans {
    pub key: GroupKey,
    pub groups: Vec<GroupMean>,
    /// Keyed rows left out because their metric was undefined.
    pub excluded_rows: usize,
}

impl GroupedMeans {
    pub fn get(&self, key: &str) -> Option<&GroupMean> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Largest mean, or `None` when there are no groups.
    pub fn max_mean(&self) -> Option<f64> {
        self.groups.iter().map(|g| g.mean).reduce(f64::max)
    }
}

/// Group-by-mean of the DZD/t.km metric keyed by `key`.
///
/// Keys sort as stored strings; "2025-10" sorts after "2025-09" only because
/// the source writes months that way. Rows with a null key are dropped. A
/// group whose every row has an undefined metric does not appear at all.
pub fn mean_by(table: &ShipmentTable, key: GroupKey) -> GroupedMeans {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut excluded_rows = 0usize;

    for record in &table.records {
        let Some(group) = key.value(record) else {
            continue;
        };
        match record.finite_cost_per_tonne_km() {
            Some(v) => {
                let entry = sums.entry(group).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
            None => excluded_rows += 1,
        }
    }

    let groups = sums
        .into_iter()
        .map(|(k, (sum, count))| GroupMean {
            key: k.to_string(),
            mean: sum / count as f64,
            rows: count,
        })
        .collect();

    logging::log_exclusions(&format!("{:?}", key), excluded_rows, "undefined metric");

    GroupedMeans {
        key,
        groups,
        excluded_rows,
    }
}

/// Bar chart view: mean DZD/t.km per wilaya.
pub fn mean_cost_by_region(table: &ShipmentTable) -> GroupedMeans {
    mean_by(table, GroupKey::Region)
}

/// Trend view: mean DZD/t.km per period, ascending by label.
pub fn mean_cost_by_period(table: &ShipmentTable) -> GroupedMeans {
    mean_by(table, GroupKey::Period)
}

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

/// One marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mean_cost_per_tonne_km: f64,
}

/// Regions placed on the map, plus those that could not be placed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapView {
    pub points: Vec<MapPoint>,
    /// Regions with a mean but no entry in the coordinate registry.
    pub unmatched: Vec<String>,
}

/// Joins per-region means against a coordinate lookup.
///
/// The join is on the exact group key, so each bar yields at most one
/// marker. Regions the lookup does not know are listed in `unmatched` and left off
/// the map only; they stay in `means`.
pub fn join_coordinates<F>(means: &GroupedMeans, lookup: F) -> MapView
where
    F: Fn(&str) -> Option<&'static RegionCoordinate>,
{
    let mut view = MapView::default();
    for group in &means.groups {
        match lookup(&group.key) {
            Some(coord) => view.points.push(MapPoint {
                region: group.key.clone(),
                latitude: coord.latitude,
                longitude: coord.longitude,
                mean_cost_per_tonne_km: group.mean,
            }),
            None => view.unmatched.push(group.key.clone()),
        }
    }

    if !view.unmatched.is_empty() {
        logging::warn(
            logging::LogSource::Aggregator,
            Some("map"),
            &format!("no coordinates for: {}", view.unmatched.join(", ")),
        );
    }
    view
}

/// Map view over the built-in wilaya registry.
pub fn region_map(table: &ShipmentTable) -> MapView {
    join_coordinates(&mean_cost_by_region(table), regions::find_region)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
