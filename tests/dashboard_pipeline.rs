/// Integration tests for the load → filter → aggregate → render pipeline
///
/// These tests verify:
/// 1. A CSV export with untidy headers loads into typed records
/// 2. Fatal source problems surface as errors, never as partial tables
/// 3. Filtering and aggregation hold their invariants on a loaded sheet
/// 4. The source cache reloads when the file changes or is invalidated
///
/// Every fixture is written to a temporary file; nothing depends on the
/// bundled workbook being present.
///
/// Run with: cargo test --test dashboard_pipeline

use logidash::analysis::aggregate::{Summary, mean_cost_by_period, mean_cost_by_region, region_map};
use logidash::analysis::filter::{FilterOptions, apply_filter, selection_from_labels};
use logidash::cache::SourceCache;
use logidash::config::{DisplayConfig, SourceConfig};
use logidash::ingest::load_table;
use logidash::model::{Choice, DashboardError, FilterSelection, ShipmentTable};
use logidash::report::{DashboardView, render_text, to_json};

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Header row as exported: stray spaces around two of the names and an
/// extra column the dashboard does not use.
const HEADER: &str =
    " Site de chargement ;Transporteur;Période;Type de transport;Wilaya;Qté Facturée ;KM;COUT;Bon";

const ROWS: &[&str] = &[
    "ARZEW;TRANS-A;2025-01;Citerne;ALGER;10;50;5000;B-001",
    "ARZEW;TRANS-A;2025-02;Citerne;ALGER;20;10;4000;B-002",
    "SKIKDA;TRANS-B;2025-01;Plateau;ORAN;5;100;2500;B-003",
    "SKIKDA;TRANS-B;2025-02;Plateau;ORAN;0;100;1000;B-004",
    "ARZEW;TRANS-C;2025-02;Citerne;ATLANTIS;4;25;300;B-005",
    ";TRANS-A;2025-03;;CONSTANTINE;2;100;600;B-006",
];

fn write_sheet(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().expect("create temp file");
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

fn semicolon_config() -> SourceConfig {
    SourceConfig {
        csv_delimiter: ';',
        ..SourceConfig::default()
    }
}

fn load_fixture() -> (NamedTempFile, ShipmentTable) {
    let file = write_sheet(HEADER, ROWS);
    let table = load_table(file.path(), &semicolon_config()).expect("fixture should load");
    (file, table)
}

fn only(carrier: &str) -> FilterSelection {
    FilterSelection {
        carrier: Choice::Exactly(carrier.to_string()),
        ..FilterSelection::all()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_normalizes_headers_and_derives_metrics() {
    let (_file, table) = load_fixture();

    assert_eq!(table.len(), 6);
    assert_eq!(table.columns[0], "Site de chargement");
    assert_eq!(table.columns[5], "Qté Facturée");

    let first = &table.records[0];
    assert_eq!(first.region.as_deref(), Some("ALGER"));
    assert_eq!(first.cost_per_tonne_km, 10.0);
    assert_eq!(first.cost_per_tonne, 500.0);
}

#[test]
fn test_exactly_zero_denominator_rows_are_undefined() {
    let (_file, table) = load_fixture();

    for r in &table.records {
        let zero = r.billed_quantity == 0.0 || r.distance_km == 0.0;
        assert_eq!(!r.cost_per_tonne_km.is_finite(), zero, "row {:?}", r);
        if !zero {
            assert_eq!(r.cost_per_tonne_km, r.cost / (r.billed_quantity * r.distance_km));
        }
    }
    assert_eq!(table.undefined_metric_rows(), 1);
}

#[test]
fn test_empty_cells_load_as_null() {
    let (_file, table) = load_fixture();
    let last = &table.records[5];
    assert_eq!(last.loading_site, None);
    assert_eq!(last.transport_type, None);
    assert_eq!(last.carrier.as_deref(), Some("TRANS-A"));
}

#[test]
fn test_repeated_loads_are_identical() {
    let file = write_sheet(HEADER, ROWS);
    let first = load_table(file.path(), &semicolon_config()).unwrap();
    let second = load_table(file.path(), &semicolon_config()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let err = load_table(Path::new("/nonexistent/base_logistique_2025.csv"), &semicolon_config())
        .unwrap_err();
    assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
}

#[test]
fn test_missing_column_is_schema_mismatch() {
    let file = write_sheet(
        "Site de chargement;Transporteur;Période;Wilaya;Qté Facturée;KM;COUT",
        &["ARZEW;TRANS-A;2025-01;ALGER;10;50;5000"],
    );
    let err = load_table(file.path(), &semicolon_config()).unwrap_err();
    assert_eq!(
        err,
        DashboardError::SchemaMismatch {
            missing: vec!["Type de transport".to_string()]
        }
    );
}

#[test]
fn test_wrong_delimiter_reads_as_one_column_and_fails_schema() {
    let file = write_sheet(HEADER, ROWS);
    let err = load_table(file.path(), &SourceConfig::default()).unwrap_err();
    match err {
        DashboardError::SchemaMismatch { missing } => assert_eq!(missing.len(), 8),
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn test_all_sentinel_selection_returns_unfiltered_table() {
    let (_file, table) = load_fixture();
    let selection = selection_from_labels("Tous", "Tous", "Toutes", "Tous");
    assert_eq!(apply_filter(&table, &selection), table);
}

#[test]
fn test_filtering_twice_changes_nothing() {
    let (_file, table) = load_fixture();
    let selection = selection_from_labels("ARZEW", "Tous", "2025-02", "Tous");
    let once = apply_filter(&table, &selection);
    assert_eq!(once.len(), 2);
    assert_eq!(apply_filter(&once, &selection), once);
}

#[test]
fn test_unknown_carrier_gives_empty_result_and_zero_sums() {
    let (_file, table) = load_fixture();
    let filtered = apply_filter(&table, &only("X"));

    assert!(filtered.is_empty());
    let summary = Summary::of(&filtered);
    assert_eq!(summary.total_quantity_t, 0.0);
    assert_eq!(summary.total_distance_km, 0.0);
    assert_eq!(summary.total_cost, 0.0);
    assert!(mean_cost_by_region(&filtered).groups.is_empty());
    assert!(region_map(&filtered).points.is_empty());
}

#[test]
fn test_options_come_sorted_with_sentinel() {
    let (_file, table) = load_fixture();
    let options = FilterOptions::from_table(&table);
    assert_eq!(options.loading_sites, vec!["Tous", "ARZEW", "SKIKDA"]);
    assert_eq!(options.periods, vec!["Toutes", "2025-01", "2025-02", "2025-03"]);
    assert_eq!(options.transport_types, vec!["Tous", "Citerne", "Plateau"]);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn test_sums_match_direct_sum_over_filtered_rows() {
    let (_file, table) = load_fixture();
    let filtered = apply_filter(&table, &only("TRANS-A"));

    let summary = Summary::of(&filtered);
    let direct: f64 = filtered.records.iter().map(|r| r.cost).sum();
    assert_eq!(summary.total_cost, direct);
    assert_eq!(summary.total_cost, 5000.0 + 4000.0 + 600.0);
    assert_eq!(summary.row_count, 3);
}

#[test]
fn test_zero_quantity_row_does_not_poison_region_mean() {
    let (_file, table) = load_fixture();
    let bars = mean_cost_by_region(&table);

    // ORAN: 2500 / (5 * 100) = 5; the 0-tonne row is left out.
    let oran = bars.get("ORAN").unwrap();
    assert_eq!(oran.mean, 5.0);
    assert_eq!(oran.rows, 1);
    assert_eq!(bars.excluded_rows, 1);

    // ALGER: mean of 10 and 20.
    assert_eq!(bars.get("ALGER").unwrap().mean, 15.0);
}

#[test]
fn test_trend_is_in_period_order() {
    let (_file, table) = load_fixture();
    let keys: Vec<String> = mean_cost_by_period(&table).groups.into_iter().map(|g| g.key).collect();
    assert_eq!(keys, vec!["2025-01", "2025-02", "2025-03"]);
}

#[test]
fn test_region_without_coordinates_stays_on_bars_but_leaves_map() {
    let (_file, table) = load_fixture();

    let bars = mean_cost_by_region(&table);
    assert!(bars.get("ATLANTIS").is_some());

    let map = region_map(&table);
    let placed: Vec<&str> = map.points.iter().map(|p| p.region.as_str()).collect();
    assert_eq!(placed, vec!["ALGER", "CONSTANTINE", "ORAN"]);
    assert_eq!(map.unmatched, vec!["ATLANTIS".to_string()]);
}

#[test]
fn test_region_spellings_share_one_bar_and_one_marker() {
    let file = write_sheet(
        HEADER,
        &[
            "ARZEW;TRANS-A;2025-01;Citerne;ALGER;10;50;5000;B-001",
            "ARZEW;TRANS-A;2025-01;Citerne;Alger;10;10;2000;B-002",
            "ARZEW;TRANS-A;2025-01;Citerne; ALGER ;10;50;5000;B-003",
        ],
    );
    let table = load_table(file.path(), &semicolon_config()).unwrap();

    let bars = mean_cost_by_region(&table);
    assert_eq!(bars.groups.len(), 1);
    let alger = bars.get("ALGER").unwrap();
    assert_eq!(alger.rows, 3);
    assert_eq!(alger.mean, (10.0 + 20.0 + 10.0) / 3.0);

    let map = region_map(&table);
    assert_eq!(map.points.len(), 1);
    assert_eq!(map.points[0].mean_cost_per_tonne_km, alger.mean);
    assert!(map.unmatched.is_empty());
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[test]
fn test_dashboard_view_renders_and_exports() {
    let (_file, table) = load_fixture();
    let view = DashboardView::build(&table, &only("TRANS-B"));

    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.summary.total_cost, 3500.0);

    let text = render_text(&view, &DisplayConfig::default());
    assert!(text.contains("Transporteur=TRANS-B"));
    assert!(text.contains("3,500"));

    let json: serde_json::Value = serde_json::from_str(&to_json(&view).unwrap()).unwrap();
    assert_eq!(json["summary"]["row_count"], 2);
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[test]
fn test_cache_reloads_when_the_file_changes() {
    let mut file = write_sheet(HEADER, &ROWS[..2]);
    let mut cache = SourceCache::new();
    let config = semicolon_config();

    let before = cache.get_or_load(file.path(), &config).unwrap();
    assert_eq!(before.len(), 2);

    // Appending changes the file length, hence the cache key.
    writeln!(file, "{}", ROWS[2]).unwrap();
    file.flush().unwrap();

    let after = cache.get_or_load(file.path(), &config).unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_serves_the_same_table_until_invalidated() {
    let file = write_sheet(HEADER, ROWS);
    let mut cache = SourceCache::new();
    let config = semicolon_config();

    let a = cache.get_or_load(file.path(), &config).unwrap();
    let b = cache.get_or_load(file.path(), &config).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));

    cache.invalidate(file.path());
    let c = cache.get_or_load(file.path(), &config).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&a, &c));
    assert_eq!(*a, *c);
}
