//! Comma and tab separated text sources.

use std::path::{Path, PathBuf};

use crate::errors::LoadError;

use super::{Cell, RawTable, RowSource};

/// A delimited text file whose first record is the header.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedSource {
    pub fn csv(path: impl AsRef<Path>) -> Self {
        DelimitedSource {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn tsv(path: impl AsRef<Path>) -> Self {
        DelimitedSource {
            path: path.as_ref().to_path_buf(),
            delimiter: b'\t',
        }
    }

    fn unreadable(&self, e: csv::Error) -> LoadError {
        LoadError::unreadable(self.path.display().to_string(), e.to_string())
    }
}

impl RowSource for DelimitedSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.unreadable(e))?;

        let headers = reader
            .headers()
            .map_err(|e| self.unreadable(e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.unreadable(e))?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(RawTable::new(headers, rows))
    }
}
