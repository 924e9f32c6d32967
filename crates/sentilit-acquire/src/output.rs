use anyhow::{Context, Result};
use sentilit_model::{Catalog, CATALOG_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the catalog document (`livros_analisados.json`) to the output directory.
///
/// Creates the directory if it doesn't exist. Returns the written path.
pub fn write_catalog(catalog: &Catalog, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(CATALOG_FILE);
    catalog
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        books = catalog.books.len(),
        labeled = catalog.labeled_count(),
        "Wrote catalog JSON"
    );
    Ok(path)
}

/// Cache raw listing HTML for archival/debugging.
///
/// The page can then be re-examined without re-fetching it.
pub fn cache_html(cache_dir: &Path, filename: &str, html: &str) -> Result<()> {
    fs::create_dir_all(cache_dir)?;
    let path = cache_dir.join(filename);
    fs::write(&path, html)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}
