use crate::book::Book;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default file name of the persisted catalog.
pub const CATALOG_FILE: &str = "livros_analisados.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted document: every collected book, labeled or not.
///
/// On disk this is `{"livros": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(rename = "livros")]
    pub books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the catalog as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn labeled_count(&self) -> usize {
        self.books.iter().filter(|b| b.is_labeled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let catalog = Catalog::new(vec![Book::new("Irmãos Grimm", "Branca de Neve")]);
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json["livros"].is_array());
        assert_eq!(json["livros"][0]["autor"], "Irmãos Grimm");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(CATALOG_FILE);

        let catalog = Catalog::new(vec![
            Book::new("Edgar Allan Poe", "O Gato Preto").with_emotions(["medo", "culpa", "mistério"]),
            Book::new("Edgar Allan Poe", "O Corvo"),
        ]);
        catalog.save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
        assert_eq!(loaded.labeled_count(), 1);

        // Non-ASCII text is written as-is, not escaped
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("mistério"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE);
        fs::write(&path, "{\"livros\": 3}").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Json(_))));
    }
}
