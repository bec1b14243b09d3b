//! JSON sources: an array of objects, one object per row.
//!
//! ```json
//! [
//!   { "x": 0, "Shear force": 0, "Bending Moment": 0 },
//!   { "x": 5, "Shear force": 10, "Bending Moment": 25 }
//! ]
//! ```
//!
//! The header is the union of keys across all rows, in first-seen order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::LoadError;

use super::{Cell, RawTable, RowSource};

#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn unreadable(&self, reason: impl Into<String>) -> LoadError {
        LoadError::unreadable(self.path.display().to_string(), reason)
    }
}

fn convert_value(value: &Value) -> Cell {
    match value {
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        Value::String(s) => Cell::from_text(s),
        Value::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

/// Build a table from an already-parsed JSON value.
pub(crate) fn table_from_value(value: &Value) -> Result<RawTable, String> {
    let items = value
        .as_array()
        .ok_or_else(|| "expected a JSON array of row objects".to_string())?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| format!("row {} is not a JSON object", i + 1))?;
        for key in object.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(object);
    }

    let rows = objects
        .iter()
        .map(|object| {
            headers
                .iter()
                .map(|h| object.get(h).map(convert_value).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

impl RowSource for JsonSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> &'static str {
        "JSON"
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.unreadable(e.to_string()))?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| self.unreadable(format!("invalid JSON: {}", e)))?;
        table_from_value(&value).map_err(|reason| self.unreadable(reason))
    }
}
