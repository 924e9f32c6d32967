use anyhow::{Context, Result};
use sentilit_model::{author_slug, Book};
use std::fs;
use std::path::{Path, PathBuf};

pub mod aggregate;
pub mod color;
pub mod heatmap;
pub mod insights;
pub mod radar;
pub mod wordcloud;

pub use aggregate::{Aggregates, AuthorAggregate};

pub const HEATMAP_FILE: &str = "heatmap_sentimentos.svg";
pub const RADAR_FILE: &str = "radar_sentimentos.svg";
pub const OVERALL_CLOUD_FILE: &str = "nuvem_geral.svg";
pub const INSIGHTS_FILE: &str = "insights_autores.txt";

/// Word cloud file for one author, e.g. `nuvem_edgar_allan_poe.svg`.
pub fn author_cloud_file(author: &str) -> String {
    format!("nuvem_{}.svg", author_slug(author))
}

/// Render every chart and the insights report into `output_dir`.
///
/// Returns the paths written. With no books nothing is written. A chart
/// that fails to render is logged and skipped; the remaining artifacts are
/// still produced.
pub fn generate_report(books: &[Book], output_dir: &Path) -> Result<Vec<PathBuf>> {
    if books.is_empty() {
        tracing::warn!("Nothing to visualize: no books were collected");
        return Ok(Vec::new());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let aggregates = Aggregates::from_books(books);
    let mut written = Vec::new();
    let mut emit = |path: PathBuf, result: Result<()>| match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Wrote artifact");
            written.push(path);
        }
        Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to render artifact"),
    };

    if aggregates.emotion_axis().is_empty() {
        tracing::warn!("No emotions labeled; skipping heatmap and radar chart");
    } else {
        let path = output_dir.join(HEATMAP_FILE);
        emit(path.clone(), heatmap::render(&aggregates, &path));

        let path = output_dir.join(RADAR_FILE);
        emit(path.clone(), radar::render(&aggregates, &path));
    }

    for (author, aggregate) in &aggregates.authors {
        if aggregate.emotions.is_empty() {
            tracing::debug!(author = %author, "No emotions; skipping word cloud");
            continue;
        }
        let path = output_dir.join(author_cloud_file(author));
        let title = format!("Emotions in the works of {author}");
        emit(
            path.clone(),
            wordcloud::render(&aggregate.tally(), &title, wordcloud::AUTHOR_CANVAS, &color::VIRIDIS, &path),
        );
    }

    if !aggregates.all_emotions.is_empty() {
        let path = output_dir.join(OVERALL_CLOUD_FILE);
        emit(
            path.clone(),
            wordcloud::render(
                &aggregates.overall_tally(),
                "Emotions in classic works (all authors)",
                wordcloud::OVERALL_CANVAS,
                &color::PLASMA,
                &path,
            ),
        );
    }

    let path = output_dir.join(INSIGHTS_FILE);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z").to_string();
    let text = insights::render(&aggregates, &generated_at);
    emit(
        path.clone(),
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display())),
    );

    Ok(written)
}
