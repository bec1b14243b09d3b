//! # PDF Rendering via Typst
//!
//! Compiles generated markup in-process with the Typst compiler and exports
//! the result with `typst-pdf`.
//!
//! ## Architecture
//!
//! - The markup comes from [`super::markup::to_typst`]
//! - Images are served to the compiler from memory under their virtual names
//! - Fonts are the ones bundled with `typst-assets`, parsed once per process
//! - Output is raw PDF bytes (`Vec<u8>`)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::document::ReportDocument;
use crate::errors::RenderError;
use crate::file_io::{ensure_parent_dir, write_atomic};

use super::markup::{to_typst, TypstSource};
use super::{RenderOutcome, Renderer};

/// Bundled fonts, loaded on first use
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    tracing::debug!("Loaded {} bundled fonts", fonts.len());
    fonts
});

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world: one main source plus in-memory image files.
struct ReportWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Image bytes keyed by their root-relative virtual path
    files: HashMap<PathBuf, Bytes>,
}

impl ReportWorld {
    fn new(source: &TypstSource) -> Result<Self, RenderError> {
        let main_id = FileId::new(None, VirtualPath::new("main.typ"));

        let mut files = HashMap::new();
        for asset in &source.assets {
            let bytes = fs::read(&asset.source).map_err(|e| {
                RenderError::io("read image", asset.source.display().to_string(), e.to_string())
            })?;
            files.insert(PathBuf::from(&asset.virtual_path), Bytes::new(bytes));
        }

        Ok(ReportWorld {
            main: Source::new(main_id, source.text.clone()),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
            files,
        })
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        match (id.package(), self.files.get(path)) {
            (None, Some(bytes)) => Ok(bytes.clone()),
            _ => Err(FileError::NotFound(path.into())),
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now();
        Datetime::from_ymd(now.year(), now.month().try_into().ok()?, now.day().try_into().ok()?)
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile generated markup to PDF bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(RenderError::Compile)` - Typst rejected the markup (no source path attached)
/// * `Err(RenderError::Export)` - The PDF exporter failed
/// * `Err(RenderError::Io)` - A referenced image could not be read
pub fn compile_pdf(source: &TypstSource) -> Result<Vec<u8>, RenderError> {
    let world = ReportWorld::new(source)?;

    let warned = typst::compile(&world);
    for warning in warned.warnings.iter() {
        tracing::warn!("Typst warning: {}", warning.message);
    }

    let document = warned.output.map_err(|errors| RenderError::Compile {
        diagnostics: errors.iter().map(|e| e.message.to_string()).collect(),
        source_path: None,
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        RenderError::Export {
            reason: error_msgs.join("; "),
        }
    })
}

/// Write the markup to `path` and copy its images next to it, so the file
/// compiles on its own with the Typst CLI.
pub fn write_source_bundle(source: &TypstSource, path: &Path) -> Result<(), RenderError> {
    ensure_parent_dir(path)?;
    write_atomic(path, source.text.as_bytes())?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    for asset in &source.assets {
        let target = dir.join(&asset.virtual_path);
        fs::copy(&asset.source, &target).map_err(|e| {
            RenderError::io("copy image", target.display().to_string(), e.to_string())
        })?;
    }
    Ok(())
}

/// Prefix for asset names derived from the output file stem
fn asset_prefix(output: &Path) -> String {
    output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string())
}

// ============================================================================
// Renderers
// ============================================================================

/// Renders a PDF, optionally keeping the Typst source next to it.
#[derive(Debug, Clone)]
pub struct TypstPdfRenderer {
    pub keep_source: bool,
}

impl Default for TypstPdfRenderer {
    fn default() -> Self {
        TypstPdfRenderer { keep_source: true }
    }
}

impl Renderer for TypstPdfRenderer {
    fn name(&self) -> &'static str {
        "typst-pdf"
    }

    fn render(&self, document: &ReportDocument, output: &Path) -> Result<RenderOutcome, RenderError> {
        let source = to_typst(document, &asset_prefix(output));

        // Written before compiling so it survives a compile failure
        let source_path = if self.keep_source {
            let path = output.with_extension("typ");
            write_source_bundle(&source, &path)?;
            tracing::debug!("Typst source kept at {}", path.display());
            Some(path)
        } else {
            None
        };

        let pdf = compile_pdf(&source).map_err(|e| match e {
            RenderError::Compile { diagnostics, .. } => RenderError::Compile {
                diagnostics,
                source_path: source_path.as_ref().map(|p| p.display().to_string()),
            },
            other => other,
        })?;

        ensure_parent_dir(output)?;
        write_atomic(output, &pdf)?;
        tracing::info!("Wrote {} ({} bytes)", output.display(), pdf.len());

        Ok(RenderOutcome {
            artifact: output.to_path_buf(),
            intermediate: source_path,
        })
    }
}

/// Writes only the Typst markup (and its images).
#[derive(Debug, Clone, Default)]
pub struct TypstSourceRenderer;

impl Renderer for TypstSourceRenderer {
    fn name(&self) -> &'static str {
        "typst-source"
    }

    fn render(&self, document: &ReportDocument, output: &Path) -> Result<RenderOutcome, RenderError> {
        let source = to_typst(document, &asset_prefix(output));
        write_source_bundle(&source, output)?;
        tracing::info!("Wrote {}", output.display());

        Ok(RenderOutcome {
            artifact: output.to_path_buf(),
            intermediate: None,
        })
    }
}
