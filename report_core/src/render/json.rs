//! JSON rendering of the document tree, for inspection or downstream tools.

use std::path::Path;

use crate::document::ReportDocument;
use crate::errors::RenderError;
use crate::file_io::{ensure_parent_dir, write_atomic};

use super::{RenderOutcome, Renderer};

#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &ReportDocument, output: &Path) -> Result<RenderOutcome, RenderError> {
        let json = serde_json::to_string_pretty(document).map_err(|e| RenderError::Serialization {
            reason: e.to_string(),
        })?;

        ensure_parent_dir(output)?;
        write_atomic(output, json.as_bytes())?;
        tracing::info!("Wrote {}", output.display());

        Ok(RenderOutcome {
            artifact: output.to_path_buf(),
            intermediate: None,
        })
    }
}
