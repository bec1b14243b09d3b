//! # Presentation Formatter
//!
//! Converts a dataset into the fragments the document is built from: a data
//! table and two line-chart descriptions.
//!
//! ## Table Downsampling
//!
//! Tables of up to [`TABLE_ROW_LIMIT`] records list every record. Longer
//! datasets list every second record, starting with the first, so the table
//! stays on one page.
//!
//! ## Chart Coordinates
//!
//! The shear chart carries raw values. The moment chart rounds moments to two
//! decimal places. Positions are never rounded.
//!
//! ```rust
//! use report_core::config::UnitLabels;
//! use report_core::dataset::{BeamDataset, BeamRecord};
//! use report_core::format::{moment_chart, shear_chart};
//!
//! let dataset = BeamDataset::new(vec![BeamRecord::new(1.0, 12.3456, 12.3456)]).unwrap();
//! let units = UnitLabels::default();
//!
//! assert_eq!(shear_chart(&dataset, &units).coordinates(), "(1,12.3456)");
//! assert_eq!(moment_chart(&dataset, &units).coordinates(), "(1,12.35)");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::UnitLabels;
use crate::dataset::BeamDataset;

/// Largest dataset whose table lists every record
pub const TABLE_ROW_LIMIT: usize = 15;

/// Row stride used for a dataset of `count` records.
pub fn table_stride(count: usize) -> usize {
    if count <= TABLE_ROW_LIMIT {
        1
    } else {
        2
    }
}

// ============================================================================
// Table
// ============================================================================

/// Three-column table of formatted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFragment {
    pub headers: [String; 3],
    pub rows: Vec<[String; 3]>,
}

/// Format the data table: position to one decimal, shear and moment to two.
pub fn table_fragment(dataset: &BeamDataset, units: &UnitLabels) -> TableFragment {
    let stride = table_stride(dataset.len());
    tracing::debug!("Table stride {} for {} records", stride, dataset.len());

    let rows = dataset
        .iter()
        .step_by(stride)
        .map(|r| {
            [
                format!("{:.1}", r.position),
                format!("{:.2}", r.shear),
                format!("{:.2}", r.moment),
            ]
        })
        .collect();

    TableFragment {
        headers: [
            format!("Position ({})", units.length),
            format!("Shear Force ({})", units.force),
            format!("Bending Moment ({})", units.moment),
        ],
        rows,
    }
}

// ============================================================================
// Charts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

/// Stroke color of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesColor {
    Blue,
    Red,
}

/// A single plotted series. Coordinates are pre-formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub color: SeriesColor,
    pub points: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: ChartSeries,
}

impl ChartSpec {
    /// Coordinates as `(x,y) (x,y) ...`
    pub fn coordinates(&self) -> String {
        self.series
            .points
            .iter()
            .map(|(x, y)| format!("({},{})", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn distance_label(units: &UnitLabels) -> String {
    format!("Distance along beam ({})", units.length)
}

/// Shear-vs-position line chart with unrounded values.
pub fn shear_chart(dataset: &BeamDataset, units: &UnitLabels) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        x_label: distance_label(units),
        y_label: format!("Shear Force ({})", units.force),
        series: ChartSeries {
            name: "Shear Force".to_string(),
            color: SeriesColor::Blue,
            points: dataset
                .iter()
                .map(|r| (r.position.to_string(), r.shear.to_string()))
                .collect(),
        },
    }
}

/// Moment-vs-position line chart, moments rounded to two decimals.
pub fn moment_chart(dataset: &BeamDataset, units: &UnitLabels) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        x_label: distance_label(units),
        y_label: format!("Bending Moment ({})", units.moment),
        series: ChartSeries {
            name: "Bending Moment".to_string(),
            color: SeriesColor::Red,
            points: dataset
                .iter()
                .map(|r| (r.position.to_string(), format!("{:.2}", r.moment)))
                .collect(),
        },
    }
}

/// All presentation fragments for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragments {
    pub table: TableFragment,
    pub shear_chart: ChartSpec,
    pub moment_chart: ChartSpec,
}

impl Fragments {
    pub fn build(dataset: &BeamDataset, units: &UnitLabels) -> Self {
        Fragments {
            table: table_fragment(dataset, units),
            shear_chart: shear_chart(dataset, units),
            moment_chart: moment_chart(dataset, units),
        }
    }
}
