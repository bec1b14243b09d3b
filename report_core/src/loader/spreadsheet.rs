//! Workbook sources (Excel and OpenDocument) read with calamine.
//!
//! Only the first worksheet is read. Its first used row is the header;
//! every following row is data.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use crate::errors::LoadError;

use super::{Cell, RawTable, RowSource};

#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        SpreadsheetSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn unreadable(&self, reason: impl Into<String>) -> LoadError {
        LoadError::unreadable(self.path.display().to_string(), reason)
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::from_text(s),
        Data::Empty => Cell::Empty,
        // Dates, booleans and error cells are kept as text and rejected
        // later if they land in a mapped column
        other => Cell::Text(other.to_string()),
    }
}

impl RowSource for SpreadsheetSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> &'static str {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ods") => "OpenDocument",
            _ => "Excel",
        }
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.unreadable(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| self.unreadable("workbook has no worksheets"))?
            .map_err(|e| self.unreadable(e.to_string()))?;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => return Err(LoadError::empty(self.name())),
        };

        let rows = rows.map(|row| row.iter().map(convert_cell).collect()).collect();

        // The range starts at the first used cell, not at A1
        let header_offset = range.start().map_or(0, |(row, _)| row as usize);
        Ok(RawTable::new(headers, rows).with_header_offset(header_offset))
    }
}
