//! Logistics shipment dashboard.
//!
//! Loads one spreadsheet of shipment records, derives DZD/t.km and DZD/t for
//! every row, filters by loading site, carrier, period and transport type,
//! and reduces the result to KPIs, a per-wilaya bar chart, a per-period trend
//! and a map of wilaya means.
//!
//! Pipeline: `ingest` → `analysis::filter` → `analysis::aggregate` → `report`,
//! with `cache` keeping the loaded table between filter changes.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod report;
