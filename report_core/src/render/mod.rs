//! # Renderers
//!
//! A [`Renderer`] takes an assembled [`ReportDocument`] and writes one
//! artifact. Swapping the renderer changes the output format without
//! touching loading, summary or formatting.
//!
//! - [`TypstPdfRenderer`] - PDF compiled in-process with Typst
//! - [`TypstSourceRenderer`] - the Typst markup only
//! - [`JsonRenderer`] - the document tree as JSON

pub mod json;
pub mod markup;
pub mod pdf;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{OutputFormat, ReportConfig};
use crate::document::ReportDocument;
use crate::errors::RenderError;

pub use json::JsonRenderer;
pub use pdf::{TypstPdfRenderer, TypstSourceRenderer};

/// Files produced by a successful render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutcome {
    /// The requested artifact
    pub artifact: PathBuf,
    /// Intermediate file kept for inspection, if any
    pub intermediate: Option<PathBuf>,
}

pub trait Renderer {
    /// Short name for log lines
    fn name(&self) -> &'static str;

    fn render(&self, document: &ReportDocument, output: &Path) -> Result<RenderOutcome, RenderError>;
}

/// The renderer selected by `config.format`.
pub fn renderer_for(config: &ReportConfig) -> Box<dyn Renderer> {
    match config.format {
        OutputFormat::Pdf => Box::new(TypstPdfRenderer {
            keep_source: config.keep_source,
        }),
        OutputFormat::Typst => Box::new(TypstSourceRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
