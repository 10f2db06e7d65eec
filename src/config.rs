//! Dashboard configuration.
//!
//! Settings live in a small TOML file. Every key is optional; a missing file
//! means "all defaults", which points the loader at the bundled 2025 sheet.
//!
//! The file location can be overridden with `LOGIDASH_CONFIG`, either in the
//! environment or in a `.env` file next to the binary.

use crate::ingest::sheet;
use crate::logging::LogLevel;
use crate::model::DashboardError;
use serde::Deserialize;
use std::path::Path;

/// Workbook read when no configuration says otherwise.
pub const DEFAULT_SOURCE_PATH: &str = "base_logistique_2025.xlsx";

/// Configuration file read when `LOGIDASH_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "logidash.toml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "LOGIDASH_CONFIG";

// ============================================================================
// Configuration Structures
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

/// Where the shipment sheet comes from and how to read it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub path: String,
    /// Worksheet name; the first sheet is used when unset.
    pub sheet: Option<String>,
    /// Field delimiter for `.csv` sources.
    pub csv_delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            path: DEFAULT_SOURCE_PATH.to_string(),
            sheet: None,
            csv_delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, DashboardError> {
        self.level.parse().map_err(DashboardError::InvalidConfig)
    }
}

/// Terminal rendering knobs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Raw rows printed under the charts.
    pub table_rows: usize,
    /// Width in characters of the longest bar.
    pub bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            table_rows: 20,
            bar_width: 40,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl DashboardConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig =
            toml::from_str(text).map_err(|e| DashboardError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        if !path.exists() {
            return Ok(DashboardConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolves the configuration file from `.env` / the environment and
    /// loads it.
    pub fn from_env() -> Result<Self, DashboardError> {
        dotenv::dotenv().ok();
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.source.path.trim().is_empty() {
            return Err(DashboardError::InvalidConfig("source.path is empty".to_string()));
        }
        sheet::delimiter_byte(self.source.csv_delimiter)?;
        if self.display.bar_width == 0 {
            return Err(DashboardError::InvalidConfig("display.bar_width must be positive".to_string()));
        }
        self.logging.min_level()?;
        Ok(())
    }
}
