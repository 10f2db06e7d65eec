/// Filtering and aggregation for the logistics dashboard.
///
/// Everything in here is a pure function of a `ShipmentTable`; nothing reads
/// files or holds state between calls, so each filter change simply reruns
/// the whole pass.
///
/// Submodules:
/// - `filter` — the four sidebar predicates and their option lists.
/// - `aggregate` — KPI sums and the group-by-mean views behind each chart.

pub mod aggregate;
pub mod filter;
