use anyhow::{Context, Result};
use sentilit_acquire::AuthorSource;
use sentilit_label::{GenerativeBackend, Labeler};
use sentilit_model::{Book, Catalog};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Courtesy pause after each author whose page yielded books.
pub const AUTHOR_PAUSE: Duration = Duration::from_secs(3);

/// Collect books author by author, labeling each author's batch as it arrives
/// when a labeler is given.
///
/// `fetch` never fails: an author whose page can't be read contributes no
/// books and is followed by no pause.
pub async fn collect_books<F, Fut, B>(
    authors: &[AuthorSource],
    mut fetch: F,
    labeler: Option<&Labeler<B>>,
    pause: Duration,
) -> Vec<Book>
where
    F: FnMut(AuthorSource) -> Fut,
    Fut: Future<Output = Vec<Book>>,
    B: GenerativeBackend,
{
    let mut all_books = Vec::new();

    for &author in authors {
        let mut books = fetch(author).await;
        if books.is_empty() {
            tracing::warn!(author = %author.name, "No books collected");
            continue;
        }

        if let Some(labeler) = labeler {
            labeler.label_books(&mut books).await;
        }
        tracing::info!(author = %author.name, books = books.len(), "Collected author");
        all_books.extend(books);
        tokio::time::sleep(pause).await;
    }

    all_books
}

/// Labeling is best effort in a full run: without a usable API
/// configuration the books are still collected and reported, unlabeled.
pub fn optional_labeler<B: GenerativeBackend>(labeler: Result<Labeler<B>>) -> Option<Labeler<B>> {
    match labeler {
        Ok(labeler) => Some(labeler),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Labeling disabled; books will stay unlabeled");
            None
        }
    }
}

/// Read a catalog document written by an earlier stage.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load(path).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        books = catalog.books.len(),
        labeled = catalog.labeled_count(),
        "Loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentilit_acquire::CLASSIC_AUTHORS;
    use sentilit_label::GeminiClient;
    use std::cell::RefCell;
    use tokio::time::Instant;

    fn no_labeler() -> Option<&'static Labeler<GeminiClient>> {
        None
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_only_after_authors_with_books() {
        let fetched = RefCell::new(Vec::new());
        let fetch = |author: AuthorSource| {
            fetched.borrow_mut().push(author.name);
            let books = match author.name {
                "Edgar Allan Poe" => vec![
                    Book::new(author.name, "O Gato Preto"),
                    Book::new(author.name, "O Corvo"),
                ],
                "Agatha Christie" => vec![Book::new(author.name, "Morte no Nilo")],
                _ => Vec::new(),
            };
            async move { books }
        };

        let start = Instant::now();
        let books = collect_books(&CLASSIC_AUTHORS, fetch, no_labeler(), AUTHOR_PAUSE).await;
        let elapsed = start.elapsed();

        assert_eq!(fetched.borrow().len(), 5);
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["O Gato Preto", "O Corvo", "Morte no Nilo"]);
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_millis(6010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_books_no_pause() {
        let start = Instant::now();
        let books = collect_books(&CLASSIC_AUTHORS, |_| async { Vec::new() }, no_labeler(), AUTHOR_PAUSE).await;

        assert!(books.is_empty());
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[test]
    fn test_missing_api_config_disables_labeling() {
        let missing: Result<Labeler<GeminiClient>> =
            Err(anyhow::anyhow!("Required environment variable 'GEMINI_API_KEY' is not set"));
        assert!(optional_labeler(missing).is_none());

        let client = GeminiClient::new(&sentilit_label::GeminiConfig::new("k")).unwrap();
        assert!(optional_labeler(Ok(Labeler::new(client))).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlabeled_run_still_collects_books() {
        let missing: Result<Labeler<GeminiClient>> = Err(anyhow::anyhow!("no key"));
        let labeler = optional_labeler(missing);
        let fetch = |author: AuthorSource| async move { vec![Book::new(author.name, "Obra")] };

        let books = collect_books(&CLASSIC_AUTHORS[..2], fetch, labeler.as_ref(), AUTHOR_PAUSE).await;

        assert_eq!(books.len(), 2);
        assert!(books.iter().all(|b| !b.is_labeled()));
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros_analisados.json");

        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("livros_analisados.json"));

        let catalog = Catalog::new(vec![Book::new("Irmãos Grimm", "Rapunzel").with_emotions(["esperança"])]);
        catalog.save(&path).unwrap();
        assert_eq!(load_catalog(&path).unwrap(), catalog);
    }
}
