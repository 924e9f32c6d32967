use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on emotion labels attached to a single book.
pub const MAX_EMOTIONS: usize = 3;

/// A book collected from an author's listing page.
///
/// Serialized with the field names of the persisted catalog document
/// (`autor`, `titulo`, ...), so output files stay readable by the tools
/// that consumed earlier runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Author display name (e.g., "Edgar Allan Poe").
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "titulo")]
    pub title: String,
    /// Concatenated description paragraphs. May be empty.
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "link_download", default)]
    pub download_link: Option<String>,
    /// Absolute cover image URL.
    #[serde(rename = "imagem_capa", default)]
    pub cover_image: Option<String>,
    /// Emotion labels, empty until the labeler has run. Never more than
    /// [`MAX_EMOTIONS`] entries.
    #[serde(
        rename = "sentimentos",
        default,
        deserialize_with = "deserialize_emotions"
    )]
    emotions: Vec<String>,
}

impl Book {
    /// Create an unlabeled book record.
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            description: String::new(),
            download_link: None,
            cover_image: None,
            emotions: Vec::new(),
        }
    }

    pub fn emotions(&self) -> &[String] {
        &self.emotions
    }

    /// Replace the emotion labels, keeping at most [`MAX_EMOTIONS`].
    pub fn set_emotions(&mut self, mut emotions: Vec<String>) {
        emotions.truncate(MAX_EMOTIONS);
        self.emotions = emotions;
    }

    /// Builder-style variant of [`Book::set_emotions`].
    pub fn with_emotions<I, S>(mut self, emotions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_emotions(emotions.into_iter().map(Into::into).collect());
        self
    }

    /// A book counts as labeled once it carries at least one emotion.
    pub fn is_labeled(&self) -> bool {
        !self.emotions.is_empty()
    }
}

/// File-name friendly form of an author name: lowercase, whitespace runs
/// become `_`, path separators are dropped.
///
/// "Edgar Allan Poe" becomes "edgar_allan_poe"; "H.P. Lovecraft" becomes
/// "h.p._lovecraft".
pub fn author_slug(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(*c, '/' | '\\'))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_")
}

fn deserialize_emotions<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut emotions = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    emotions.truncate(MAX_EMOTIONS);
    Ok(emotions)
}
