/// ShipmentRecord, ShipmentTable, FilterSelection, DashboardError
/// core data structures and error handling
///
/// Core data types for the logistics dashboard.
///
/// This module defines the shared domain model imported by all other modules.
/// Apart from the two derived cost metrics it contains no logic and no I/O.

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Loading site (filter dimension).
pub const COL_LOADING_SITE: &str = "Site de chargement";

/// Carrier (filter dimension).
pub const COL_CARRIER: &str = "Transporteur";

/// Month label (filter dimension and trend axis).
pub const COL_PERIOD: &str = "Période";

/// Transport type (filter dimension).
pub const COL_TRANSPORT_TYPE: &str = "Type de transport";

/// Wilaya name, uppercase in the source.
pub const COL_REGION: &str = "Wilaya";

/// Billed quantity in tonnes.
pub const COL_BILLED_QUANTITY: &str = "Qté Facturée";

/// Distance in kilometres.
pub const COL_DISTANCE_KM: &str = "KM";

/// Shipment cost in DZD.
pub const COL_COST: &str = "COUT";

/// Every column the loader refuses to work without, in source order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_LOADING_SITE,
    COL_CARRIER,
    COL_PERIOD,
    COL_TRANSPORT_TYPE,
    COL_REGION,
    COL_BILLED_QUANTITY,
    COL_DISTANCE_KM,
    COL_COST,
];

/// "No constraint" label for the site, carrier and transport type filters.
pub const SENTINEL_ALL: &str = "Tous";

/// "No constraint" label for the period filter.
pub const SENTINEL_ALL_PERIODS: &str = "Toutes";

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One row of the shipment sheet, with its derived cost metrics.
///
/// Categorical fields are `None` when the cell was empty. Numeric fields are
/// NaN when the cell was empty or unparseable, the way a dataframe marks a
/// missing value.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShipmentRecord {
    pub loading_site: Option<String>,
    pub carrier: Option<String>,
    pub period: Option<String>,
    pub transport_type: Option<String>,
    pub region: Option<String>,
    pub billed_quantity: f64, // tonnes
    pub distance_km: f64,
    pub cost: f64, // DZD
    /// `cost / (billed_quantity * distance_km)`, non-finite on a zero denominator.
    pub cost_per_tonne_km: f64,
    /// `cost / billed_quantity`, non-finite on a zero denominator.
    pub cost_per_tonne: f64,
}

impl ShipmentRecord {
    /// Builds a record and computes both derived metrics.
    ///
    /// Division follows IEEE-754: a zero denominator produces ±inf (or NaN
    /// when the cost is also zero) instead of panicking.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        loading_site: Option<String>,
        carrier: Option<String>,
        period: Option<String>,
        transport_type: Option<String>,
        region: Option<String>,
        billed_quantity: f64,
        distance_km: f64,
        cost: f64,
    ) -> Self {
        ShipmentRecord {
            loading_site,
            carrier,
            period,
            transport_type,
            region,
            billed_quantity,
            distance_km,
            cost,
            cost_per_tonne_km: cost / (billed_quantity * distance_km),
            cost_per_tonne: cost / billed_quantity,
        }
    }

    /// The DZD/t.km metric, or `None` when it is undefined for this row.
    pub fn finite_cost_per_tonne_km(&self) -> Option<f64> {
        Some(self.cost_per_tonne_km).filter(|v| v.is_finite())
    }
}

// Floats compare by bit pattern so two loads of the same sheet are equal even
// when they carry NaN.
impl PartialEq for ShipmentRecord {
    fn eq(&self, other: &Self) -> bool {
        self.loading_site == other.loading_site
            && self.carrier == other.carrier
            && self.period == other.period
            && self.transport_type == other.transport_type
            && self.region == other.region
            && self.billed_quantity.to_bits() == other.billed_quantity.to_bits()
            && self.distance_km.to_bits() == other.distance_km.to_bits()
            && self.cost.to_bits() == other.cost.to_bits()
            && self.cost_per_tonne_km.to_bits() == other.cost_per_tonne_km.to_bits()
            && self.cost_per_tonne.to_bits() == other.cost_per_tonne.to_bits()
    }
}

/// The loaded sheet: normalized headers plus typed rows.
///
/// Filtering produces a new table; a table is never edited in place once
/// built.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct ShipmentTable {
    /// Header names after whitespace trimming, in source order.
    pub columns: Vec<String>,
    pub records: Vec<ShipmentRecord>,
}

impl ShipmentTable {
    pub fn new(columns: Vec<String>, records: Vec<ShipmentRecord>) -> Self {
        ShipmentTable { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows whose DZD/t.km metric is undefined.
    pub fn undefined_metric_rows(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.finite_cost_per_tonne_km().is_none())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// One filter dimension's state: unconstrained, or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub enum Choice {
    #[default]
    Any,
    Exactly(String),
}

impl Choice {
    /// Maps a selectbox label to a choice; the sentinel label means `Any`.
    pub fn from_label(label: &str, sentinel: &str) -> Self {
        if label == sentinel {
            Choice::Any
        } else {
            Choice::Exactly(label.to_string())
        }
    }

    /// Whether a (possibly null) cell value satisfies this choice.
    /// Null never matches an exact value.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Choice::Any => true,
            Choice::Exactly(wanted) => value == Some(wanted.as_str()),
        }
    }

    /// Label shown in a selectbox, using `sentinel` for `Any`.
    pub fn label<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            Choice::Any => sentinel,
            Choice::Exactly(v) => v,
        }
    }
}

/// The four categorical filters of the dashboard sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct FilterSelection {
    pub loading_site: Choice,
    pub carrier: Choice,
    pub period: Choice,
    pub transport_type: Choice,
}

impl FilterSelection {
    /// No constraint on any dimension.
    pub fn all() -> Self {
        FilterSelection::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.loading_site == Choice::Any
            && self.carrier == Choice::Any
            && self.period == Choice::Any
            && self.transport_type == Choice::Any
    }

    /// One-line summary such as `Transporteur=X, Période=2025-01`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            (COL_LOADING_SITE, &self.loading_site),
            (COL_CARRIER, &self.carrier),
            (COL_PERIOD, &self.period),
            (COL_TRANSPORT_TYPE, &self.transport_type),
        ]
        .iter()
        .filter_map(|(name, choice)| match choice {
            Choice::Any => None,
            Choice::Exactly(v) => Some(format!("{}={}", name, v)),
        })
        .collect();

        if parts.is_empty() {
            "no filter".to_string()
        } else {
            parts.join(", ")
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that stop the dashboard before anything is rendered.
///
/// Undefined metrics and regions without coordinates are not errors: the
/// aggregator excludes them and reports how many it dropped.
#[derive(Debug, PartialEq)]
pub enum DashboardError {
    /// The source file is missing, unreadable, corrupt or of an unknown type.
    SourceUnavailable { path: String, reason: String },
    /// Required columns are absent after header normalization.
    SchemaMismatch { missing: Vec<String> },
    /// The configuration file could not be read or holds invalid values.
    InvalidConfig(String),
    /// A view could not be serialized.
    Export(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::SourceUnavailable { path, reason } => {
                write!(f, "Source unavailable: {} ({})", path, reason)
            }
            DashboardError::SchemaMismatch { missing } => {
                write!(f, "Schema mismatch: missing column(s) {}", missing.join(", "))
            }
            DashboardError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            DashboardError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
