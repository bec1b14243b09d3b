//! # Beam Dataset
//!
//! Pre-computed analysis results: one [`BeamRecord`] per station along the
//! beam, held in a [`BeamDataset`] that is never empty.
//!
//! ## Example
//!
//! ```rust
//! use report_core::dataset::{BeamDataset, BeamRecord};
//!
//! let dataset = BeamDataset::new(vec![
//!     BeamRecord::new(0.0, 0.0, 0.0),
//!     BeamRecord::new(5.0, 10.0, 25.0),
//! ])
//! .unwrap();
//! assert_eq!(dataset.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// One station along the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamRecord {
    /// Distance from the left support
    pub position: f64,
    /// Shear force (signed)
    pub shear: f64,
    /// Bending moment (signed)
    pub moment: f64,
}

impl BeamRecord {
    pub fn new(position: f64, shear: f64, moment: f64) -> Self {
        BeamRecord {
            position,
            shear,
            moment,
        }
    }
}

/// Ordered, non-empty sequence of records in position order.
///
/// The records are private so the non-empty invariant holds for every value
/// of this type, including deserialized ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BeamRecord>", into = "Vec<BeamRecord>")]
pub struct BeamDataset {
    records: Vec<BeamRecord>,
}

impl BeamDataset {
    /// Build a dataset, rejecting an empty record list.
    pub fn new(records: Vec<BeamRecord>) -> Result<Self, LoadError> {
        Self::from_source("records", records)
    }

    /// Build a dataset read from `source_name`, which is named in the error
    /// if there are no records.
    pub fn from_source(source_name: &str, records: Vec<BeamRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::empty(source_name));
        }

        if let Some(pair) = records.windows(2).find(|w| w[1].position < w[0].position) {
            tracing::warn!(
                "Positions in {} are not in increasing order ({} follows {})",
                source_name,
                pair[1].position,
                pair[0].position
            );
        }

        Ok(BeamDataset { records })
    }

    pub fn records(&self) -> &[BeamRecord] {
        &self.records
    }

    /// First record in sequence order
    pub fn first(&self) -> &BeamRecord {
        // Non-empty by construction
        &self.records[0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BeamRecord> {
        self.records.iter()
    }
}

impl TryFrom<Vec<BeamRecord>> for BeamDataset {
    type Error = LoadError;

    fn try_from(records: Vec<BeamRecord>) -> Result<Self, Self::Error> {
        BeamDataset::new(records)
    }
}

impl From<BeamDataset> for Vec<BeamRecord> {
    fn from(dataset: BeamDataset) -> Self {
        dataset.records
    }
}

impl<'a> IntoIterator for &'a BeamDataset {
    type Item = &'a BeamRecord;
    type IntoIter = std::slice::Iter<'a, BeamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_rejected() {
        let err = BeamDataset::from_source("Force.xlsx", Vec::new()).unwrap_err();
        assert_eq!(err, LoadError::empty("Force.xlsx"));
    }

    #[test]
    fn test_order_preserved() {
        let dataset = BeamDataset::new(vec![
            BeamRecord::new(0.0, 1.0, 0.0),
            BeamRecord::new(2.0, 0.5, 1.5),
            BeamRecord::new(4.0, -1.0, 0.0),
        ])
        .unwrap();

        let positions: Vec<f64> = dataset.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0.0, 2.0, 4.0]);
        assert_eq!(dataset.first().shear, 1.0);
    }

    #[test]
    fn test_deserialize_enforces_non_empty() {
        let ok: BeamDataset =
            serde_json::from_str(r#"[{"position": 0.0, "shear": 1.0, "moment": 2.0}]"#).unwrap();
        assert_eq!(ok.len(), 1);

        let empty: Result<BeamDataset, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }
}
