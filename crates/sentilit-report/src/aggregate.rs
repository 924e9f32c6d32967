use sentilit_model::{Book, EmotionTally};
use std::collections::{BTreeMap, BTreeSet};

/// Everything collected for one author.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorAggregate {
    /// Emotions of all the author's books, concatenated in collection order.
    pub emotions: Vec<String>,
    pub titles: Vec<String>,
}

impl AuthorAggregate {
    pub fn tally(&self) -> EmotionTally {
        self.emotions.iter().collect()
    }
}

/// Per-author and global emotion data for the charts and the report.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Keyed by author name, so iteration is in sorted author order.
    pub authors: BTreeMap<String, AuthorAggregate>,
    /// Every emotion of every book, in collection order.
    pub all_emotions: Vec<String>,
}

impl Aggregates {
    pub fn from_books(books: &[Book]) -> Self {
        let mut aggregates = Self::default();
        for book in books {
            let entry = aggregates.authors.entry(book.author.clone()).or_default();
            entry.emotions.extend(book.emotions().iter().cloned());
            entry.titles.push(book.title.clone());
            aggregates.all_emotions.extend(book.emotions().iter().cloned());
        }
        aggregates
    }

    /// Sorted author names; the row order of every chart.
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.keys().map(String::as_str).collect()
    }

    /// Sorted distinct emotion labels; the column/axis order of every chart.
    pub fn emotion_axis(&self) -> Vec<&str> {
        self.all_emotions
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Occurrence counts, one row per author, one column per axis emotion.
    pub fn frequency_matrix(&self) -> Vec<Vec<usize>> {
        let axis = self.emotion_axis();
        self.authors
            .values()
            .map(|aggregate| {
                let tally = aggregate.tally();
                axis.iter().map(|emotion| tally.count(emotion)).collect()
            })
            .collect()
    }

    pub fn overall_tally(&self) -> EmotionTally {
        self.all_emotions.iter().collect()
    }
}
