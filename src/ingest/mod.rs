/// Shipment sheet loading for the logistics dashboard.
///
/// Submodules:
/// - `sheet` — reads workbooks and CSV exports into untyped cells.
///
/// This module owns everything between raw cells and a `ShipmentTable`:
/// header normalization, the schema check, typing of each cell and the
/// derived cost metrics.

pub mod sheet;

use crate::config::SourceConfig;
use crate::logging::{self, LogSource};
use crate::model::{
    COL_BILLED_QUANTITY, COL_CARRIER, COL_COST, COL_DISTANCE_KM, COL_LOADING_SITE, COL_PERIOD,
    COL_REGION, COL_TRANSPORT_TYPE, DashboardError, REQUIRED_COLUMNS, ShipmentRecord,
    ShipmentTable,
};
use crate::regions;
use sheet::{Cell, RawSheet};
use std::path::Path;

/// Reads and types the shipment sheet at `path`.
///
/// Fails with `SourceUnavailable` when the file cannot be read and with
/// `SchemaMismatch` when a required column is absent; no partial table is
/// ever returned.
pub fn load_table(path: &Path, config: &SourceConfig) -> Result<ShipmentTable, DashboardError> {
    let raw = sheet::read_sheet(path, config)?;
    let table = build_table(raw)?;

    logging::log_load_summary(
        &path.display().to_string(),
        table.len(),
        table.undefined_metric_rows(),
    );
    Ok(table)
}

/// Strips leading and trailing whitespace from every header name.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| h.trim().to_string()).collect()
}

/// Positions of the required columns within a normalized header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    loading_site: usize,
    carrier: usize,
    period: usize,
    transport_type: usize,
    region: usize,
    billed_quantity: usize,
    distance_km: usize,
    cost: usize,
}

impl ColumnIndex {
    /// Locates every required column, reporting all missing ones at once.
    /// A duplicated header resolves to its first occurrence.
    fn resolve(columns: &[String]) -> Result<Self, DashboardError> {
        let find = |name: &str| columns.iter().position(|c| c == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::SchemaMismatch { missing });
        }

        let at = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnIndex {
            loading_site: at(COL_LOADING_SITE),
            carrier: at(COL_CARRIER),
            period: at(COL_PERIOD),
            transport_type: at(COL_TRANSPORT_TYPE),
            region: at(COL_REGION),
            billed_quantity: at(COL_BILLED_QUANTITY),
            distance_km: at(COL_DISTANCE_KM),
            cost: at(COL_COST),
        })
    }
}

/// Types a raw sheet into a `ShipmentTable`.
///
/// Fully empty rows are skipped. Wilaya names are trimmed and uppercased. Numeric cells that cannot be read as a
/// number become NaN and are reported with a single warning.
pub fn build_table(raw: RawSheet) -> Result<ShipmentTable, DashboardError> {
    let columns = normalize_headers(&raw.headers);
    let index = ColumnIndex::resolve(&columns)?;

    let mut unparseable = 0usize;
    let mut records = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        let cell = |i: usize| row.get(i).unwrap_or(&Cell::Empty);
        let mut number = |i: usize| {
            let (value, parsed) = cell_number(cell(i));
            if !parsed {
                unparseable += 1;
            }
            value
        };

        let billed_quantity = number(index.billed_quantity);
        let distance_km = number(index.distance_km);
        let cost = number(index.cost);

        records.push(ShipmentRecord::new(
            cell_label(cell(index.loading_site)),
            cell_label(cell(index.carrier)),
            cell_label(cell(index.period)),
            cell_label(cell(index.transport_type)),
            cell_region(cell(index.region)),
            billed_quantity,
            distance_km,
            cost,
        ));
    }

    if unparseable > 0 {
        logging::warn(
            LogSource::Loader,
            None,
            &format!("{} numeric cell(s) could not be parsed and were treated as missing", unparseable),
        );
    }

    Ok(ShipmentTable::new(columns, records))
}

/// Reads the wilaya cell as its registry spelling, so the bar chart and the
/// map group on the same key.
fn cell_region(cell: &Cell) -> Option<String> {
    cell_label(cell)
        .map(|name| regions::normalize_region_name(&name))
        .filter(|name| !name.is_empty())
}

/// Reads a categorical cell; empty cells are null.
fn cell_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(n) => Some(sheet::number_label(*n)),
    }
}

/// Reads a numeric cell as `(value, parsed)`.
///
/// Empty and whitespace-only cells are NaN without counting as a parse
/// failure; text that does not parse as `f64` is NaN and flagged.
fn cell_number(cell: &Cell) -> (f64, bool) {
    match cell {
        Cell::Empty => (f64::NAN, true),
        Cell::Number(n) => (*n, true),
        Cell::Text(s) if s.trim().is_empty() => (f64::NAN, true),
        Cell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) => (v, true),
            Err(_) => (f64::NAN, false),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
