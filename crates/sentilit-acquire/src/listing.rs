use crate::normalize::clean_text;
use crate::output;
use anyhow::Result;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use sentilit_model::{author_slug, Book};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Books collected per author when no cap is given.
pub const DEFAULT_MAX_BOOKS: usize = 3;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure to retrieve a listing page. The author yields no books.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure to read a single book container. Only that book is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("download anchor has no href")]
    MissingHref,

    #[error("cannot resolve site-relative image path '{0}'")]
    UnresolvableImage(String),
}

/// Downloads listing pages through a single reused HTTP client.
pub struct Fetcher {
    client: reqwest::Client,
    html_cache: Option<PathBuf>,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("sentilit/0.1 (book emotion survey)")
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            html_cache: None,
        })
    }

    /// Also write each fetched page to `dir` as `raw_{author}.html`.
    pub fn with_html_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.html_cache = Some(dir.into());
        self
    }

    /// Collect up to `max_books` books for one author.
    ///
    /// Never fails: a page that cannot be fetched is logged and yields an
    /// empty list, so the run moves on to the next author.
    pub async fn fetch_author(&self, author: &str, url: &str, max_books: usize) -> Vec<Book> {
        tracing::info!(author = %author, url = %url, "Collecting books");

        let html = match self.fetch_page(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(author = %author, error = %e, "Failed to fetch listing page");
                return Vec::new();
            }
        };
        tracing::debug!(bytes = html.len(), "Received HTML");

        if let Some(dir) = &self.html_cache {
            let filename = format!("raw_{}.html", author_slug(author));
            if let Err(e) = output::cache_html(dir, &filename, &html) {
                tracing::warn!(error = %e, "Failed to cache raw HTML");
            }
        }

        let books = parse_listing_page(&html, author, url, max_books);
        tracing::info!(author = %author, books = books.len(), "Parsed listing page");
        books
    }

    /// Body of the page at `url`. An error status is logged but its body is
    /// still returned; a page without book containers yields no books anyway.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "Listing page returned an error status");
        }

        Ok(response.text().await?)
    }
}

struct ListingSelectors {
    container: Selector,
    centered_heading: Selector,
    heading: Selector,
    download: Selector,
    anchor: Selector,
    description: Selector,
    paragraph: Selector,
    image: Selector,
}

impl ListingSelectors {
    fn new() -> Self {
        let sel = |s: &str| Selector::parse(s).expect("valid selector");
        Self {
            container: sel("div.content_libro_autor"),
            centered_heading: sel("h2.has-text-align-center"),
            heading: sel("h3"),
            download: sel("div.btn-descargar"),
            anchor: sel("a"),
            description: sel("div.descripcion"),
            paragraph: sel("p"),
            image: sel("img"),
        }
    }
}

/// Parse an author's listing page into at most `max_books` book records.
///
/// `page_url` is the address the page was fetched from; site-relative cover
/// paths are resolved against it. Containers that fail to extract are
/// logged and skipped.
pub fn parse_listing_page(html: &str, author: &str, page_url: &str, max_books: usize) -> Vec<Book> {
    let document = Html::parse_document(html);
    let selectors = ListingSelectors::new();
    let base = Url::parse(page_url).ok();

    document
        .select(&selectors.container)
        .take(max_books)
        .enumerate()
        .filter_map(|(index, container)| {
            match extract_book(container, author, base.as_ref(), &selectors) {
                Ok(book) => Some(book),
                Err(e) => {
                    tracing::warn!(author = %author, index, error = %e, "Skipping book");
                    None
                }
            }
        })
        .collect()
}

fn extract_book(
    container: ElementRef,
    author: &str,
    base: Option<&Url>,
    selectors: &ListingSelectors,
) -> Result<Book, ExtractError> {
    let title = container
        .select(&selectors.centered_heading)
        .next()
        .or_else(|| container.select(&selectors.heading).next())
        .map(|h| clean_text(&element_text(h)))
        .unwrap_or_else(|| format!("Book by {author}"));

    // Only the first download block is considered, as on the live pages
    let download_link = match container
        .select(&selectors.download)
        .next()
        .and_then(|d| d.select(&selectors.anchor).next())
    {
        Some(a) => Some(a.value().attr("href").ok_or(ExtractError::MissingHref)?.to_string()),
        None => None,
    };

    let description = container
        .select(&selectors.description)
        .next()
        .map(|d| {
            d.select(&selectors.paragraph)
                .map(element_text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let cover_image = container
        .select(&selectors.image)
        .next()
        .and_then(|img| {
            let attr = |name| img.value().attr(name).filter(|v: &&str| !v.is_empty());
            attr("data-src").or_else(|| attr("src"))
        })
        .map(|src| resolve_image(src, base))
        .transpose()?;

    let mut book = Book::new(author, title);
    book.description = description;
    book.download_link = download_link;
    book.cover_image = cover_image;
    Ok(book)
}

fn element_text(el: ElementRef) -> String {
    el.text().collect()
}

/// Site-relative paths (`/wp-content/...`) become absolute against the page URL.
fn resolve_image(src: &str, base: Option<&Url>) -> Result<String, ExtractError> {
    if !src.starts_with('/') {
        return Ok(src.to_string());
    }
    base.and_then(|b| b.join(src).ok())
        .map(String::from)
        .ok_or_else(|| ExtractError::UnresolvableImage(src.to_string()))
}
