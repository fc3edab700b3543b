//! Loading and storing the target source file.
//!
//! The whole file is read into one UTF-8 buffer and written back verbatim.
//! Writes truncate the existing file; there is no backup and no atomic rename.

use crate::error::{Result, SpliceError};
use std::path::Path;

/// Read the file at `path` into a single text buffer.
pub fn load(path: &Path) -> Result<String> {
	let buffer = std::fs::read_to_string(path).map_err(|source| SpliceError::SourceRead {
		path: path.to_path_buf(),
		source,
	})?;

	tracing::info!(path = %path.display(), bytes = buffer.len(), "loaded source");
	Ok(buffer)
}

/// Overwrite the file at `path` with `buffer`.
pub fn store(path: &Path, buffer: &str) -> Result<()> {
	std::fs::write(path, buffer).map_err(|source| SpliceError::SourceWrite {
		path: path.to_path_buf(),
		source,
	})?;

	tracing::info!(path = %path.display(), bytes = buffer.len(), "stored source");
	Ok(())
}
