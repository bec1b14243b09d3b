//! # File Output
//!
//! Artifact writes use atomic semantics: write to a `.tmp` sibling, sync,
//! then rename over the destination. An interrupted run never leaves a
//! half-written report behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use report_core::file_io::{ensure_parent_dir, write_atomic};
//! use std::path::Path;
//!
//! let path = Path::new("output/report.typ");
//! ensure_parent_dir(path)?;
//! write_atomic(path, b"= Beam Analysis Report")?;
//! # Ok::<(), report_core::errors::RenderError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::RenderError;

/// Create the directory that will hold `path`, if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), RenderError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            fs::create_dir_all(dir).map_err(|e| {
                RenderError::io("create directory", dir.display().to_string(), e.to_string())
            })?;
            tracing::debug!("Created output directory {}", dir.display());
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Temporary sibling used while writing `path`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write `bytes` to `path` atomically.
///
/// The write process:
/// 1. Write to a temporary file (`<path>.tmp`)
/// 2. Sync to disk (fsync)
/// 3. Rename over `path`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        RenderError::io("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        RenderError::io("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        RenderError::io("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        RenderError::io("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}
