//! # Data Loader
//!
//! Turns a tabular file into a [`BeamDataset`]. Every backend implements
//! [`RowSource`] and produces a [`RawTable`] (header names plus rows of
//! cells); column mapping and cell conversion are shared.
//!
//! ## Supported Sources
//! - Spreadsheets (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`), first worksheet
//! - Delimited text (`.csv`, `.tsv`)
//! - JSON arrays of objects (`.json`)
//!
//! ## Column Mapping
//!
//! Headers are compared after normalisation: lower case, any unit suffix in
//! parentheses or brackets removed, and only letters and digits kept. So
//! `"Bending Moment (kN·m)"` matches the alias `"bending moment"`.
//!
//! ## Example
//!
//! ```rust
//! use report_core::loader::{load_from, Cell, ColumnMapping, RawTable};
//!
//! let table = RawTable::new(
//!     vec!["x".into(), "Shear force".into(), "Bending Moment".into()],
//!     vec![
//!         vec![Cell::Number(0.0), Cell::Number(10.0), Cell::Number(0.0)],
//!         vec![Cell::Number(5.0), Cell::Number(0.0), Cell::Number(25.0)],
//!     ],
//! );
//!
//! let dataset = load_from(&table, &ColumnMapping::default()).unwrap();
//! assert_eq!(dataset.len(), 2);
//! ```

mod delimited;
mod json;
mod spreadsheet;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::dataset::{BeamDataset, BeamRecord};
use crate::errors::LoadError;

pub use delimited::DelimitedSource;
pub use json::JsonSource;
pub use spreadsheet::SpreadsheetSource;

// ============================================================================
// Raw Tables
// ============================================================================

/// A single cell as read from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Build a cell from text, treating blank text as empty.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Header names plus data rows, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Source rows above the header, for row numbers in errors
    #[serde(default)]
    pub header_offset: usize,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        RawTable {
            headers,
            rows,
            header_offset: 0,
        }
    }

    pub fn with_header_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }
}

/// Anything that can supply a header row and data rows.
pub trait RowSource {
    /// Name used in log lines and error messages
    fn name(&self) -> String;

    /// Human-readable kind of source ("Excel", "CSV", ...)
    fn kind(&self) -> &'static str;

    fn read_table(&self) -> Result<RawTable, LoadError>;
}

impl RowSource for RawTable {
    fn name(&self) -> String {
        "in-memory table".to_string()
    }

    fn kind(&self) -> &'static str {
        "in-memory"
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        Ok(self.clone())
    }
}

// ============================================================================
// Column Mapping
// ============================================================================

const POSITION_ALIASES: &[&str] = &["x", "position", "distance", "pos", "location"];
const SHEAR_ALIASES: &[&str] = &["shear force", "shear", "v", "sf"];
const MOMENT_ALIASES: &[&str] = &["bending moment", "moment", "m", "bm"];

/// Accepted header names for each required column, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub position: Vec<String>,
    pub shear: Vec<String>,
    pub moment: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        fn owned(aliases: &[&str]) -> Vec<String> {
            aliases.iter().map(|s| s.to_string()).collect()
        }

        ColumnMapping {
            position: owned(POSITION_ALIASES),
            shear: owned(SHEAR_ALIASES),
            moment: owned(MOMENT_ALIASES),
        }
    }
}

impl ColumnMapping {
    /// Default aliases with any explicitly configured names tried first.
    pub fn with_overrides(names: &ColumnNames) -> Self {
        let mut mapping = ColumnMapping::default();
        if let Some(name) = &names.position {
            mapping.position.insert(0, name.clone());
        }
        if let Some(name) = &names.shear {
            mapping.shear.insert(0, name.clone());
        }
        if let Some(name) = &names.moment {
            mapping.moment.insert(0, name.clone());
        }
        mapping
    }
}

/// Header indices of the three required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub position: usize,
    pub shear: usize,
    pub moment: usize,
}

/// Normalise a header for comparison.
pub fn normalize_header(header: &str) -> String {
    let base = header
        .split(|c| c == '(' || c == '[')
        .next()
        .unwrap_or(header);
    base.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    aliases.iter().find_map(|alias| {
        let wanted = normalize_header(alias);
        normalized.iter().position(|h| !h.is_empty() && *h == wanted)
    })
}

/// Map the required columns onto header indices.
pub fn resolve_columns(headers: &[String], mapping: &ColumnMapping) -> Result<ResolvedColumns, LoadError> {
    let lookup = |column: &str, aliases: &[String]| {
        find_column(headers, aliases).ok_or_else(|| LoadError::missing_column(column, headers))
    };

    Ok(ResolvedColumns {
        position: lookup("position", &mapping.position)?,
        shear: lookup("shear", &mapping.shear)?,
        moment: lookup("moment", &mapping.moment)?,
    })
}

// ============================================================================
// Loading
// ============================================================================

/// Read a dataset from any [`RowSource`].
pub fn load_from(source: &dyn RowSource, mapping: &ColumnMapping) -> Result<BeamDataset, LoadError> {
    let name = source.name();
    let table = source.read_table()?;

    tracing::debug!("Columns in {}: {:?}", name, table.headers);
    let columns = resolve_columns(&table.headers, mapping)?;
    tracing::debug!(
        "Using columns '{}', '{}', '{}'",
        table.headers[columns.position],
        table.headers[columns.shear],
        table.headers[columns.moment]
    );

    let mut records = Vec::with_capacity(table.rows.len());
    for (index, row) in table.rows.iter().enumerate() {
        // Row numbers as a spreadsheet user sees them, counting from 1
        let row_number = table.header_offset + index + 2;
        if let Some(record) = convert_row(row, row_number, &columns, &table.headers)? {
            records.push(record);
        }
    }

    let dataset = BeamDataset::from_source(&name, records)?;
    tracing::info!("Read {} data points from {}", dataset.len(), name);
    Ok(dataset)
}

fn convert_row(
    row: &[Cell],
    row_number: usize,
    columns: &ResolvedColumns,
    headers: &[String],
) -> Result<Option<BeamRecord>, LoadError> {
    let cell = |index: usize| row.get(index).unwrap_or(&Cell::Empty);
    let indices = [columns.position, columns.shear, columns.moment];

    if indices.iter().all(|&i| cell(i).is_empty()) {
        return Ok(None);
    }

    let mut values = [0.0; 3];
    for (slot, &index) in values.iter_mut().zip(indices.iter()) {
        *slot = cell_value(cell(index), row_number, &headers[index])?;
    }

    Ok(Some(BeamRecord::new(values[0], values[1], values[2])))
}

fn cell_value(cell: &Cell, row_number: usize, column: &str) -> Result<f64, LoadError> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s
            .parse::<f64>()
            .map_err(|_| LoadError::invalid_value(row_number, column, s.as_str()))?,
        Cell::Empty => return Err(LoadError::invalid_value(row_number, column, "")),
    };

    if !value.is_finite() {
        return Err(LoadError::invalid_value(row_number, column, cell.to_string()));
    }
    Ok(value)
}

/// Pick a [`RowSource`] for a path based on its extension.
pub fn source_for_path(path: &Path) -> Result<Box<dyn RowSource>, LoadError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(SpreadsheetSource::new(path))),
        "csv" => Ok(Box::new(DelimitedSource::csv(path))),
        "tsv" => Ok(Box::new(DelimitedSource::tsv(path))),
        "json" => Ok(Box::new(JsonSource::new(path))),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.display().to_string(),
            extension,
        }),
    }
}

/// Human-readable kind of the source at `path`, if it is a supported format.
pub fn source_kind(path: &Path) -> Option<&'static str> {
    source_for_path(path).ok().map(|source| source.kind())
}

/// Load a dataset from a file.
///
/// # Returns
///
/// * `Ok(BeamDataset)` - At least one record was read
/// * `Err(LoadError::SourceNotFound)` - `path` does not exist
/// * `Err(LoadError::UnsupportedFormat)` - No reader for the extension
/// * `Err(LoadError::MissingColumn)` - A required column is absent
/// * `Err(LoadError::Empty)` - The table has no data rows
pub fn load(path: &Path, mapping: &ColumnMapping) -> Result<BeamDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::source_not_found(path.display().to_string()));
    }

    let source = source_for_path(path)?;
    load_from(source.as_ref(), mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn num(n: f64) -> Cell {
        Cell::Number(n)
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Shear force"), "shearforce");
        assert_eq!(normalize_header("Bending Moment (kN·m)"), "bendingmoment");
        assert_eq!(normalize_header(" x [m] "), "x");
        assert_eq!(normalize_header("POSITION_M"), "positionm");
    }

    #[test]
    fn test_resolve_reference_headers() {
        let columns = resolve_columns(
            &headers(&["x", "Shear force", "Bending Moment"]),
            &ColumnMapping::default(),
        )
        .unwrap();
        assert_eq!(
            columns,
            ResolvedColumns {
                position: 0,
                shear: 1,
                moment: 2
            }
        );
    }

    #[test]
    fn test_extra_columns_ignored_and_order_free() {
        let columns = resolve_columns(
            &headers(&["Load case", "Moment (kNm)", "Notes", "Distance (m)", "V (kN)"]),
            &ColumnMapping::default(),
        )
        .unwrap();
        assert_eq!(columns.position, 3);
        assert_eq!(columns.shear, 4);
        assert_eq!(columns.moment, 1);
    }

    #[test]
    fn test_missing_column() {
        let err = resolve_columns(&headers(&["x", "Shear force"]), &ColumnMapping::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMN");
        assert!(err.to_string().contains("'moment'"));
    }

    #[test]
    fn test_override_takes_priority() {
        let names = ColumnNames {
            position: Some("Station".to_string()),
            ..ColumnNames::default()
        };
        let columns = resolve_columns(
            &headers(&["x", "Station", "Shear", "Moment"]),
            &ColumnMapping::with_overrides(&names),
        )
        .unwrap();
        assert_eq!(columns.position, 1);
    }

    #[test]
    fn test_text_cells_parsed() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![vec![Cell::from_text(" 1.5 "), Cell::from_text("-2"), Cell::from_text("3.25")]],
        );
        let dataset = load_from(&table, &ColumnMapping::default()).unwrap();
        assert_eq!(*dataset.first(), BeamRecord::new(1.5, -2.0, 3.25));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![
                vec![num(0.0), num(1.0), num(0.0)],
                vec![Cell::Empty, Cell::Empty, Cell::Empty],
                vec![num(1.0), num(-1.0), num(0.5)],
                vec![],
            ],
        );
        let dataset = load_from(&table, &ColumnMapping::default()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_partial_row_rejected() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![
                vec![num(0.0), num(1.0), num(0.0)],
                vec![num(1.0), Cell::Empty, num(0.5)],
            ],
        );
        let err = load_from(&table, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, LoadError::invalid_value(3, "shear", ""));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![vec![num(0.0), Cell::from_text("n/a"), num(0.0)]],
        );
        let err = load_from(&table, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, LoadError::invalid_value(2, "shear", "n/a"));
    }

    #[test]
    fn test_row_number_counts_rows_above_header() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![
                vec![num(0.0), num(0.0), num(0.0)],
                vec![num(1.0), Cell::from_text("n/a"), num(0.0)],
            ],
        )
        .with_header_offset(4);
        let err = load_from(&table, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, LoadError::invalid_value(7, "shear", "n/a"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let table = RawTable::new(
            headers(&["x", "shear", "moment"]),
            vec![vec![num(0.0), num(0.0), num(f64::INFINITY)]],
        );
        let err = load_from(&table, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = RawTable::new(headers(&["x", "shear", "moment"]), Vec::new());
        let err = load_from(&table, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, LoadError::empty("in-memory table"));
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/nonexistent/Force.xlsx"), &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, LoadError::source_not_found("/nonexistent/Force.xlsx"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = source_for_path(Path::new("results.txt")).err().unwrap();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert_eq!(source_kind(Path::new("Force.xlsx")), Some("Excel"));
        assert_eq!(source_kind(Path::new("beam.CSV")), Some("CSV"));
    }
}
