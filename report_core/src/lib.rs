//! # report_core - Beam Analysis Report Engine
//!
//! `report_core` turns pre-computed beam analysis results (position, shear
//! force, bending moment) into a formatted report. No structural mechanics
//! happen here: the table is loaded, summarized and laid out.
//!
//! ## Pipeline
//!
//! ```text
//! loader ──► summary ──► format ──► document ──► render
//! (table)    (stats)     (table,    (sections)   (PDF / Typst / JSON)
//!                         charts)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use report_core::config::UnitLabels;
//! use report_core::dataset::{BeamDataset, BeamRecord};
//! use report_core::format::Fragments;
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
//! let fragments = Fragments::build(&dataset, &UnitLabels::default());
//!
//! assert_eq!(stats.max_moment_position, 5.0);
//! assert_eq!(fragments.shear_chart.coordinates(), "(0,0) (5,10) (10,-10)");
//! ```
//!
//! ## Modules
//!
//! - [`dataset`] - Records and the non-empty dataset
//! - [`loader`] - Spreadsheet, CSV and JSON readers behind `RowSource`
//! - [`summary`] - Length, extreme shear and moment
//! - [`format`] - Table and chart fragments
//! - [`document`] - Report structure and assembly
//! - [`render`] - PDF, Typst and JSON renderers
//! - [`pipeline`] - End-to-end runs
//! - [`config`] - Paths, labels and output format
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic artifact writes

pub mod config;
pub mod dataset;
pub mod document;
pub mod errors;
pub mod file_io;
pub mod format;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod summary;

// Re-export commonly used types at crate root for convenience
pub use config::{OutputFormat, ReportConfig};
pub use dataset::{BeamDataset, BeamRecord};
pub use errors::{LoadError, RenderError, ReportError, ReportResult};
pub use pipeline::{generate, run, ReportRun};
pub use summary::{summarize, SummaryStats};
