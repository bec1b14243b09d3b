//! # Report Pipeline
//!
//! One run: load → summarize → format → assemble → render. A load failure
//! stops the run before any document exists.
//!
//! ## Example
//!
//! ```rust,no_run
//! use report_core::config::ReportConfig;
//! use report_core::pipeline::generate;
//!
//! let run = generate(&ReportConfig::default())?;
//! println!("Report successfully generated: {}", run.outcome.artifact.display());
//! # Ok::<(), report_core::errors::ReportError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::document::{assemble, ReportDocument};
use crate::errors::ReportResult;
use crate::format::Fragments;
use crate::loader::{load, ColumnMapping};
use crate::render::{renderer_for, RenderOutcome, Renderer};
use crate::summary::{summarize, SummaryStats};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRun {
    pub stats: SummaryStats,
    pub outcome: RenderOutcome,
}

/// Load, summarize, format and assemble, without rendering.
pub fn build_document(config: &ReportConfig) -> ReportResult<(ReportDocument, SummaryStats)> {
    let mapping = ColumnMapping::with_overrides(&config.columns);
    let dataset = load(&config.input_path, &mapping)?;
    let stats = summarize(&dataset);
    let fragments = Fragments::build(&dataset, &config.units);
    let document = assemble(&dataset, &stats, &fragments, config);
    Ok((document, stats))
}

/// Run the whole pipeline with an explicit renderer.
pub fn run(config: &ReportConfig, renderer: &dyn Renderer) -> ReportResult<ReportRun> {
    tracing::info!("Reading beam analysis data from {}", config.input_path.display());
    let (document, stats) = build_document(config)?;

    let output = config.artifact_path();
    tracing::info!("Rendering report with {} to {}", renderer.name(), output.display());
    let outcome = renderer.render(&document, &output)?;

    Ok(ReportRun { stats, outcome })
}

/// Run the whole pipeline with the renderer chosen by `config.format`.
pub fn generate(config: &ReportConfig) -> ReportResult<ReportRun> {
    let renderer = renderer_for(config);
    run(config, renderer.as_ref())
}
