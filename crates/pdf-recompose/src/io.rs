//! File I/O for source and output documents

use crate::types::*;
use std::path::Path;

/// Read a PDF file into memory without parsing it
pub async fn load_pdf_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    Ok(bytes)
}

/// Write assembled document bytes to disk
pub async fn save_pdf_bytes(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}

/// Display name for a source loaded from `path`
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
