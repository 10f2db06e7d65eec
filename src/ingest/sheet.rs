//! Raw spreadsheet reading.
//!
//! Turns a workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) or a `.csv`
//! export into a `RawSheet`: the header row plus untyped cells. Nothing here
//! knows about shipments; column lookup and typing happen in `ingest`.
//!
//! Workbooks are read with calamine, CSV exports with the csv crate.

use crate::config::SourceConfig;
use crate::model::DashboardError;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

// ============================================================================
// Raw Sheet Structures
// ============================================================================

/// A single untyped cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text cells become `Empty` when they hold nothing.
    pub fn text(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The first row of a sheet as headers, every following row as cells.
///
/// Rows may be shorter than the header row; missing trailing cells read as
/// `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

// ============================================================================
// Reading
// ============================================================================

fn unavailable(path: &Path, reason: impl std::fmt::Display) -> DashboardError {
    DashboardError::SourceUnavailable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Reads `path` according to its extension.
pub fn read_sheet(path: &Path, config: &SourceConfig) -> Result<RawSheet, DashboardError> {
    if !path.is_file() {
        return Err(unavailable(path, "file not found"));
    }

    match SourceFormat::from_path(path) {
        Some(SourceFormat::Workbook) => read_workbook(path, config.sheet.as_deref()),
        Some(SourceFormat::Csv) => read_csv(path, delimiter_byte(config.csv_delimiter)?),
        None => Err(unavailable(path, "unsupported file type")),
    }
}

/// Converts a configured delimiter to the single byte the csv reader takes.
/// Anything outside ASCII is rejected rather than truncated.
pub fn delimiter_byte(delimiter: char) -> Result<u8, DashboardError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            DashboardError::InvalidConfig(format!(
                "csv delimiter must be a single ASCII character, got '{}'",
                delimiter
            ))
        })
}

/// Reads one worksheet: the named one, or the first one in the workbook.
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawSheet, DashboardError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unavailable(path, e))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|e| unavailable(path, format!("worksheet '{}': {}", name, e)))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| unavailable(path, "workbook contains no worksheet"))?
            .map_err(|e| unavailable(path, e))?,
    };

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(|d| header_text(&cell_from_data(d))).collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(RawSheet { headers, rows })
}

/// Reads a delimited text export whose first record is the header row.
pub fn read_csv(path: &Path, delimiter: u8) -> Result<RawSheet, DashboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| unavailable(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| unavailable(path, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| unavailable(path, e))?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    Ok(RawSheet { headers, rows })
}

// ============================================================================
// Cell Conversion
// ============================================================================

/// Maps a calamine cell onto our three-state cell.
///
/// Dates are rendered as `YYYY-MM-DD` text so a period column typed as dates
/// in Excel still sorts and filters as labels. Error cells (`#DIV/0!` and
/// friends) read as empty.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Text(ndt.format("%Y-%m-%d").to_string()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        _ => Cell::Empty,
    }
}

/// Header cells are always used as text.
fn header_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => number_label(*n),
    }
}

/// Formats a number used as a label: integral values lose the `.0`.
pub fn number_label(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection_by_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("base.xlsx")), Some(SourceFormat::Workbook));
        assert_eq!(SourceFormat::from_path(Path::new("BASE.XLS")), Some(SourceFormat::Workbook));
        assert_eq!(SourceFormat::from_path(Path::new("export.csv")), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(SourceFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_number_label_drops_integral_fraction() {
        assert_eq!(number_label(2025.0), "2025");
        assert_eq!(number_label(-3.0), "-3");
        assert_eq!(number_label(1.5), "1.5");
    }

    #[test]
    fn test_empty_text_is_an_empty_cell() {
        assert_eq!(Cell::text(""), Cell::Empty);
        assert_eq!(Cell::text(" "), Cell::Text(" ".to_string()));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = read_sheet(Path::new("/nonexistent/base.xlsx"), &SourceConfig::default()).unwrap_err();
        match err {
            DashboardError::SourceUnavailable { reason, .. } => assert_eq!(reason, "file not found"),
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension_is_source_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "COUT,KM").unwrap();
        let err = read_sheet(file.path(), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_corrupt_workbook_is_source_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"this is not a zip archive").unwrap();
        let err = read_sheet(file.path(), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';'), Ok(b';'));
        assert_eq!(delimiter_byte('\t'), Ok(b'\t'));
        // U+012C would truncate to b',' and U+00E9 is a single non-ASCII byte.
        assert!(matches!(delimiter_byte('Ĭ'), Err(DashboardError::InvalidConfig(_))));
        assert!(matches!(delimiter_byte('é'), Err(DashboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected_at_read_time() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "A,B").unwrap();
        let config = SourceConfig {
            csv_delimiter: 'Ĭ',
            ..SourceConfig::default()
        };
        let err = read_sheet(file.path(), &config).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidConfig(_)));
    }

    #[test]
    fn test_csv_reads_headers_and_short_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "A;B;C\n1;x;\n2\n").unwrap();
        let sheet = read_csv(file.path(), b';').unwrap();

        assert_eq!(sheet.headers, vec!["A", "B", "C"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(
            sheet.rows[0],
            vec![Cell::Text("1".to_string()), Cell::Text("x".to_string()), Cell::Empty]
        );
        assert_eq!(sheet.rows[1], vec![Cell::Text("2".to_string())]);
    }
}
