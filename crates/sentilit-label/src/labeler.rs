use crate::gemini::{classify_response, GenerativeBackend, ResponseOutcome};
use crate::prompt::{build_prompt, parse_emotions};
use sentilit_model::Book;
use std::time::Duration;

/// Pacing and retry budget for labeling calls.
#[derive(Debug, Clone)]
pub struct LabelerSettings {
    /// Attempts per book, counting the first one.
    pub max_attempts: u32,
    /// Wait after a transport failure or a response without text.
    pub transport_backoff: Duration,
    /// Courtesy pause after each book's labeling call.
    pub pause_between_books: Duration,
}

impl Default for LabelerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            transport_backoff: Duration::from_secs(5),
            pause_between_books: Duration::from_millis(1500),
        }
    }
}

/// Outcome counts of a labeling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Books that received emotions in this pass.
    pub labeled: usize,
    /// Books that already carried emotions and were left untouched.
    pub skipped: usize,
    /// Books that still have no emotions after their call.
    pub failed: usize,
}

/// Assigns emotion labels to books, one API call per unlabeled book.
pub struct Labeler<B> {
    backend: B,
    settings: LabelerSettings,
}

impl<B: GenerativeBackend> Labeler<B> {
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, LabelerSettings::default())
    }

    pub fn with_settings(backend: B, settings: LabelerSettings) -> Self {
        Self { backend, settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Label every book that has no emotions yet.
    ///
    /// Books with emotions are skipped without an API call, so re-running
    /// over a partially processed catalog only fills the gaps.
    pub async fn label_books(&self, books: &mut [Book]) -> LabelStats {
        let mut stats = LabelStats::default();

        for book in books.iter_mut() {
            if book.is_labeled() {
                stats.skipped += 1;
                continue;
            }

            if self.label_book(book).await {
                stats.labeled += 1;
            } else {
                stats.failed += 1;
            }
            tokio::time::sleep(self.settings.pause_between_books).await;
        }

        tracing::info!(
            labeled = stats.labeled,
            skipped = stats.skipped,
            failed = stats.failed,
            "Labeling pass complete"
        );
        stats
    }

    /// Request and store emotions for one book. Returns whether any were assigned.
    async fn label_book(&self, book: &mut Book) -> bool {
        let prompt = build_prompt(book);
        let raw = self.request_text(&prompt).await.unwrap_or_else(|| "[]".to_string());
        book.set_emotions(parse_emotions(&raw));

        if book.is_labeled() {
            tracing::info!(title = %book.title, emotions = ?book.emotions(), "Labeled book");
        } else {
            tracing::warn!(title = %book.title, "No emotions assigned");
        }
        book.is_labeled()
    }

    /// Send `prompt`, following the retry protocol.
    ///
    /// - 429: wait for the server's hint, then retry.
    /// - Transport failure or a 200 without text: wait the backoff, then retry.
    /// - Any other status: give up at once.
    ///
    /// No wait follows the final attempt. `None` when every attempt failed.
    pub async fn request_text(&self, prompt: &str) -> Option<String> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let wait = match self.backend.generate(prompt).await {
                Ok(response) => match classify_response(response.status, &response.body) {
                    ResponseOutcome::Success(text) => return Some(text),
                    ResponseOutcome::RetryAfter(delay) => {
                        tracing::warn!(attempt, delay_secs = delay.as_secs_f64(), "Rate limited");
                        delay
                    }
                    ResponseOutcome::Malformed => {
                        tracing::warn!(attempt, "Response carried no generated text");
                        self.settings.transport_backoff
                    }
                    ResponseOutcome::Abort => {
                        tracing::error!(status = response.status, body = %response.body, "API error");
                        return None;
                    }
                },
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Labeling request failed");
                    self.settings.transport_backoff
                }
            };

            if attempt < max_attempts {
                tokio::time::sleep(wait).await;
            }
        }

        tracing::error!(attempts = max_attempts, "Giving up on labeling call");
        None
    }
}
