//! Summary statistics derived from a [`BeamDataset`].
//!
//! Positions are not assumed to be evenly spaced, so the beam length is the
//! spread of the position values rather than anything derived from the
//! record count.
//!
//! ## Example
//! ```rust
//! use report_core::dataset::{BeamDataset, BeamRecord};
//! use report_core::summary::summarize;
//!
//! let dataset = BeamDataset::new(vec![
//!     BeamRecord::new(0.0, 0.0, 0.0),
//!     BeamRecord::new(5.0, 10.0, 25.0),
//!     BeamRecord::new(10.0, -10.0, 0.0),
//! ])
//! .unwrap();
//!
//! let stats = summarize(&dataset);
//! assert_eq!(stats.length, 10.0);
//! assert_eq!(stats.max_moment_position, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::dataset::BeamDataset;

/// Scalar results shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// max(position) - min(position)
    pub length: f64,
    /// max(|shear|), never negative
    pub max_abs_shear: f64,
    /// Most negative signed shear
    pub min_shear: f64,
    /// Most positive signed shear
    pub max_shear: f64,
    /// Greatest signed moment
    pub max_moment: f64,
    /// Position of the first record attaining `max_moment`
    pub max_moment_position: f64,
    /// Number of records in the dataset
    pub point_count: usize,
}

/// Compute summary statistics for a dataset.
///
/// When several records share the maximum moment, the earliest one in
/// sequence order supplies `max_moment_position`. Only a strictly greater
/// moment replaces the current maximum.
pub fn summarize(dataset: &BeamDataset) -> SummaryStats {
    let first = dataset.first();

    let mut stats = SummaryStats {
        length: 0.0,
        max_abs_shear: first.shear.abs(),
        min_shear: first.shear,
        max_shear: first.shear,
        max_moment: first.moment,
        max_moment_position: first.position,
        point_count: dataset.len(),
    };

    let mut min_position = first.position;
    let mut max_position = first.position;

    for record in dataset.iter().skip(1) {
        min_position = min_position.min(record.position);
        max_position = max_position.max(record.position);

        stats.max_abs_shear = stats.max_abs_shear.max(record.shear.abs());
        stats.min_shear = stats.min_shear.min(record.shear);
        stats.max_shear = stats.max_shear.max(record.shear);

        if record.moment > stats.max_moment {
            stats.max_moment = record.moment;
            stats.max_moment_position = record.position;
        }
    }

    stats.length = max_position - min_position;
    stats
}
