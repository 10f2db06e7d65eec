//! Dashboard views and their rendering.
//!
//! `DashboardView` is everything one screen shows for a given selection:
//! the KPIs, the bar chart, the trend line, the map markers and the raw
//! rows. It is rebuilt from scratch on every filter change.
//!
//! Two renderings are provided: a plain-text dashboard for the terminal and
//! a JSON document for anything that wants to draw real charts.

use crate::analysis::aggregate::{
    GroupedMeans, MapView, Summary, join_coordinates, mean_cost_by_period, mean_cost_by_region,
};
use crate::analysis::filter::{FilterOptions, apply_filter};
use crate::config::DisplayConfig;
use crate::model::{DashboardError, FilterSelection, ShipmentRecord, ShipmentTable};
use crate::regions;
use serde::Serialize;
use std::fmt;

pub const DASHBOARD_TITLE: &str = "Dashboard Logistique 2025";

// ============================================================================
// View Assembly
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    /// Selectbox contents, drawn from the unfiltered table.
    pub options: FilterOptions,
    pub summary: Summary,
    /// Bar chart: mean DZD/t.km per wilaya.
    pub by_region: GroupedMeans,
    /// Trend line: mean DZD/t.km per period.
    pub by_period: GroupedMeans,
    pub map: MapView,
    /// The filtered rows.
    pub rows: ShipmentTable,
}

impl DashboardView {
    /// Runs one full pass: filter, then every aggregation.
    pub fn build(table: &ShipmentTable, selection: &FilterSelection) -> Self {
        let rows = apply_filter(table, selection);
        let by_region = mean_cost_by_region(&rows);
        let map = join_coordinates(&by_region, regions::find_region);

        DashboardView {
            selection: selection.clone(),
            options: FilterOptions::from_table(table),
            summary: Summary::of(&rows),
            by_period: mean_cost_by_period(&rows),
            by_region,
            map,
            rows,
        }
    }
}

/// Serializes a view as pretty-printed JSON. Undefined metrics become `null`.
pub fn to_json(view: &DashboardView) -> Result<String, DashboardError> {
    serde_json::to_string_pretty(view).map_err(|e| DashboardError::Export(e.to_string()))
}

// ============================================================================
// Number Formatting
// ============================================================================

/// Formats `value` with `,` thousands separators and `decimals` fraction
/// digits, e.g. `1234567.8` with 0 decimals gives `1,234,568`.
///
/// Non-finite values render as `n/a`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" is not worth showing.
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn format_metric(value: f64) -> String {
    if value.is_finite() {
        format_thousands(value, 2)
    } else {
        "n/a".to_string()
    }
}

// ============================================================================
// Text Rendering
// ============================================================================

/// Terminal rendering of a view.
pub struct TextDashboard<'a> {
    pub view: &'a DashboardView,
    pub display: &'a DisplayConfig,
}

/// Renders a view as a plain-text dashboard.
pub fn render_text(view: &DashboardView, display: &DisplayConfig) -> String {
    TextDashboard { view, display }.to_string()
}

impl fmt::Display for TextDashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;

        writeln!(f, "{}", DASHBOARD_TITLE)?;
        writeln!(f, "{}", "=".repeat(DASHBOARD_TITLE.chars().count()))?;
        writeln!(f, "Filtres : {}", view.selection.describe())?;
        writeln!(f)?;

        self.write_kpis(f)?;
        writeln!(f)?;
        self.write_bars(f, "Coût moyen par Wilaya (DZD/t.km)", &view.by_region)?;
        writeln!(f)?;
        self.write_bars(f, "Évolution du coût moyen par période (DZD/t.km)", &view.by_period)?;
        writeln!(f)?;
        self.write_map(f)?;
        writeln!(f)?;
        self.write_rows(f)
    }
}

impl TextDashboard<'_> {
    fn write_kpis(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.view.summary;
        writeln!(f, "Volume transporté (t) : {:>20}", format_thousands(s.total_quantity_t, 0))?;
        writeln!(f, "Distance totale (km)  : {:>20}", format_thousands(s.total_distance_km, 0))?;
        writeln!(f, "Coût total (DZD)      : {:>20}", format_thousands(s.total_cost, 0))?;
        writeln!(f, "Lignes                : {:>20}", s.row_count)
    }

    /// Horizontal bars scaled so the largest mean fills `bar_width`.
    fn write_bars(&self, f: &mut fmt::Formatter<'_>, title: &str, means: &GroupedMeans) -> fmt::Result {
        writeln!(f, "{}", title)?;
        if means.groups.is_empty() {
            return writeln!(f, "  (aucune donnée)");
        }

        let label_width = means.groups.iter().map(|g| g.key.chars().count()).max().unwrap_or(0);
        let max = means.max_mean().unwrap_or(0.0);

        for group in &means.groups {
            let len = bar_length(group.mean, max, self.display.bar_width);
            writeln!(
                f,
                "  {:<lw$} | {:<bw$} {}",
                group.key,
                "█".repeat(len),
                format_metric(group.mean),
                lw = label_width,
                bw = self.display.bar_width,
            )?;
        }
        if means.excluded_rows > 0 {
            writeln!(f, "  ({} ligne(s) sans coût t.km exclue(s))", means.excluded_rows)?;
        }
        Ok(())
    }

    fn write_map(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = &self.view.map;
        writeln!(f, "Carte des coûts par Wilaya")?;
        if map.points.is_empty() {
            writeln!(f, "  (aucune wilaya localisée)")?;
        }
        for p in &map.points {
            writeln!(
                f,
                "  {:<22} {:>9.4} {:>9.4}  {}",
                p.region,
                p.latitude,
                p.longitude,
                format_metric(p.mean_cost_per_tonne_km)
            )?;
        }
        if !map.unmatched.is_empty() {
            writeln!(f, "  Sans coordonnées : {}", map.unmatched.join(", "))?;
        }
        Ok(())
    }

    fn write_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = &self.view.rows.records;
        let shown = rows.len().min(self.display.table_rows);
        writeln!(f, "Données ({} sur {} lignes)", shown, rows.len())?;

        let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
        let body: Vec<Vec<String>> = rows.iter().take(shown).map(table_cells).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write_table_line(f, &header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_table_line(f, &rule, &widths)?;
        for cells in &body {
            write_table_line(f, cells, &widths)?;
        }
        Ok(())
    }
}

const TABLE_HEADERS: &[&str] = &[
    "Site", "Transporteur", "Période", "Type", "Wilaya", "Qté (t)", "KM", "COUT", "DZD/t.km", "DZD/t",
];

fn table_cells(r: &ShipmentRecord) -> Vec<String> {
    let label = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    vec![
        label(&r.loading_site),
        label(&r.carrier),
        label(&r.period),
        label(&r.transport_type),
        label(&r.region),
        format_thousands(r.billed_quantity, 2),
        format_thousands(r.distance_km, 0),
        format_thousands(r.cost, 0),
        format_metric(r.cost_per_tonne_km),
        format_metric(r.cost_per_tonne),
    ]
}

fn write_table_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    writeln!(f, "  {}", padded.join(" | ").trim_end())
}

/// Bar length for `value` when `max` maps to `width` characters. Positive
/// values always get at least one character.
fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if value.is_nan() || max.is_nan() || value <= 0.0 || max <= 0.0 {
        return 0;
    }
    let len = (value / max * width as f64).round() as usize;
    len.clamp(1, width)
}

/// Summary line used in logs after each recomputation.
pub fn describe_view(view: &DashboardView) -> String {
    format!(
        "{} rows, {} region(s), {} period(s), {} map point(s)",
        view.summary.row_count,
        view.by_region.groups.len(),
        view.by_period.groups.len(),
        view.map.points.len()
    )
}
