///wilaya coordinate registry, the map join lives on top of this
/// a static table of region names to the WGS84 position of each wilaya's chief town.
/// It is reference data, not derived from the shipment sheet; a wilaya that
/// is missing here only disappears from the map view.
/// Region registry for the logistics dashboard.
///
/// Defines the canonical list of Algerian wilayas, keyed by the uppercase
/// name used in the `Wilaya` column of the shipment sheet. This is the single
/// source of truth for map coordinates — the aggregator should reference
/// positions from here rather than hardcoding them.

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// Position of a single wilaya.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCoordinate {
    /// Official wilaya number (1–58).
    pub code: u8,
    /// Uppercase name without diacritics, as stored in the sheet.
    pub name: &'static str,
    /// WGS84 latitude of the chief town.
    pub latitude: f64,
    /// WGS84 longitude of the chief town.
    pub longitude: f64,
}

/// All 58 wilayas, ordered by official number.
///
/// Coordinates point at each wilaya's chief town; they only need to be good
/// enough to place a marker on a country-scale map.
pub static REGION_REGISTRY: &[RegionCoordinate] = &[
    RegionCoordinate { code: 1, name: "ADRAR", latitude: 27.8742, longitude: -0.2939 },
    RegionCoordinate { code: 2, name: "CHLEF", latitude: 36.1653, longitude: 1.3345 },
    RegionCoordinate { code: 3, name: "LAGHOUAT", latitude: 33.8000, longitude: 2.8650 },
    RegionCoordinate { code: 4, name: "OUM EL BOUAGHI", latitude: 35.8775, longitude: 7.1136 },
    RegionCoordinate { code: 5, name: "BATNA", latitude: 35.5550, longitude: 6.1741 },
    RegionCoordinate { code: 6, name: "BEJAIA", latitude: 36.7509, longitude: 5.0567 },
    RegionCoordinate { code: 7, name: "BISKRA", latitude: 34.8500, longitude: 5.7333 },
    RegionCoordinate { code: 8, name: "BECHAR", latitude: 31.6167, longitude: -2.2167 },
    RegionCoordinate { code: 9, name: "BLIDA", latitude: 36.4700, longitude: 2.8277 },
    RegionCoordinate { code: 10, name: "BOUIRA", latitude: 36.3750, longitude: 3.9000 },
    RegionCoordinate { code: 11, name: "TAMANRASSET", latitude: 22.7850, longitude: 5.5228 },
    RegionCoordinate { code: 12, name: "TEBESSA", latitude: 35.4042, longitude: 8.1242 },
    RegionCoordinate { code: 13, name: "TLEMCEN", latitude: 34.8828, longitude: -1.3167 },
    RegionCoordinate { code: 14, name: "TIARET", latitude: 35.3711, longitude: 1.3170 },
    RegionCoordinate { code: 15, name: "TIZI OUZOU", latitude: 36.7169, longitude: 4.0497 },
    RegionCoordinate { code: 16, name: "ALGER", latitude: 36.7538, longitude: 3.0588 },
    RegionCoordinate { code: 17, name: "DJELFA", latitude: 34.6704, longitude: 3.2630 },
    RegionCoordinate { code: 18, name: "JIJEL", latitude: 36.8200, longitude: 5.7667 },
    RegionCoordinate { code: 19, name: "SETIF", latitude: 36.1911, longitude: 5.4137 },
    RegionCoordinate { code: 20, name: "SAIDA", latitude: 34.8303, longitude: 0.1517 },
    RegionCoordinate { code: 21, name: "SKIKDA", latitude: 36.8667, longitude: 6.9000 },
    RegionCoordinate { code: 22, name: "SIDI BEL ABBES", latitude: 35.1899, longitude: -0.6309 },
    RegionCoordinate { code: 23, name: "ANNABA", latitude: 36.9000, longitude: 7.7667 },
    RegionCoordinate { code: 24, name: "GUELMA", latitude: 36.4621, longitude: 7.4261 },
    RegionCoordinate { code: 25, name: "CONSTANTINE", latitude: 36.3650, longitude: 6.6147 },
    RegionCoordinate { code: 26, name: "MEDEA", latitude: 36.2642, longitude: 2.7539 },
    RegionCoordinate { code: 27, name: "MOSTAGANEM", latitude: 35.9311, longitude: 0.0892 },
    RegionCoordinate { code: 28, name: "M'SILA", latitude: 35.7058, longitude: 4.5419 },
    RegionCoordinate { code: 29, name: "MASCARA", latitude: 35.3967, longitude: 0.1403 },
    RegionCoordinate { code: 30, name: "OUARGLA", latitude: 31.9493, longitude: 5.3250 },
    RegionCoordinate { code: 31, name: "ORAN", latitude: 35.6971, longitude: -0.6308 },
    RegionCoordinate { code: 32, name: "EL BAYADH", latitude: 33.6831, longitude: 1.0192 },
    RegionCoordinate { code: 33, name: "ILLIZI", latitude: 26.4833, longitude: 8.4667 },
    RegionCoordinate { code: 34, name: "BORDJ BOU ARRERIDJ", latitude: 36.0731, longitude: 4.7611 },
    RegionCoordinate { code: 35, name: "BOUMERDES", latitude: 36.7664, longitude: 3.4772 },
    RegionCoordinate { code: 36, name: "EL TARF", latitude: 36.7672, longitude: 8.3137 },
    RegionCoordinate { code: 37, name: "TINDOUF", latitude: 27.6711, longitude: -8.1474 },
    RegionCoordinate { code: 38, name: "TISSEMSILT", latitude: 35.6072, longitude: 1.8108 },
    RegionCoordinate { code: 39, name: "EL OUED", latitude: 33.3683, longitude: 6.8674 },
    RegionCoordinate { code: 40, name: "KHENCHELA", latitude: 35.4358, longitude: 7.1433 },
    RegionCoordinate { code: 41, name: "SOUK AHRAS", latitude: 36.2864, longitude: 7.9511 },
    RegionCoordinate { code: 42, name: "TIPAZA", latitude: 36.5897, longitude: 2.4475 },
    RegionCoordinate { code: 43, name: "MILA", latitude: 36.4503, longitude: 6.2644 },
    RegionCoordinate { code: 44, name: "AIN DEFLA", latitude: 36.2640, longitude: 1.9679 },
    RegionCoordinate { code: 45, name: "NAAMA", latitude: 33.2667, longitude: -0.3167 },
    RegionCoordinate { code: 46, name: "AIN TEMOUCHENT", latitude: 35.2972, longitude: -1.1400 },
    RegionCoordinate { code: 47, name: "GHARDAIA", latitude: 32.4909, longitude: 3.6735 },
    RegionCoordinate { code: 48, name: "RELIZANE", latitude: 35.7373, longitude: 0.5558 },
    RegionCoordinate { code: 49, name: "TIMIMOUN", latitude: 29.2639, longitude: 0.2306 },
    RegionCoordinate { code: 50, name: "BORDJ BADJI MOKHTAR", latitude: 21.3275, longitude: 0.9500 },
    RegionCoordinate { code: 51, name: "OULED DJELLAL", latitude: 34.4167, longitude: 5.0667 },
    RegionCoordinate { code: 52, name: "BENI ABBES", latitude: 30.1333, longitude: -2.1667 },
    RegionCoordinate { code: 53, name: "IN SALAH", latitude: 27.1950, longitude: 2.4833 },
    RegionCoordinate { code: 54, name: "IN GUEZZAM", latitude: 19.5686, longitude: 5.7722 },
    RegionCoordinate { code: 55, name: "TOUGGOURT", latitude: 33.1000, longitude: 6.0667 },
    RegionCoordinate { code: 56, name: "DJANET", latitude: 24.5542, longitude: 9.4847 },
    RegionCoordinate { code: 57, name: "EL M'GHAIR", latitude: 33.9500, longitude: 5.9167 },
    RegionCoordinate { code: 58, name: "EL MENIA", latitude: 30.5833, longitude: 2.8833 },
];

/// Registry spelling of a wilaya name: trimmed and uppercased.
///
/// The loader applies this to every `Wilaya` cell, so `" Oran"` and `"ORAN"`
/// land in the same group before any lookup happens.
pub fn normalize_region_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Looks up a region by its exact registry name. Returns `None` if not found.
pub fn find_region(name: &str) -> Option<&'static RegionCoordinate> {
    REGION_REGISTRY.iter().find(|r| r.name == name)
}

/// Returns the names of all registered regions.
pub fn all_region_names() -> Vec<&'static str> {
    REGION_REGISTRY.iter().map(|r| r.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
