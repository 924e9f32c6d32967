// Occurrence counting for emotion labels.
//
// Counts are kept in first-encountered order so that ranking ties resolve
// the same way on every run: the label seen first wins.

use std::collections::HashMap;

/// Occurrence counter that remembers the order labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionTally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl EmotionTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.index.get(label).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all occurrences.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Highest single count, or 0 for an empty tally.
    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    /// Labels with their counts, in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Up to `n` labels by descending count. Ties keep first-encountered order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable, which is what preserves the tie order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for EmotionTally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = Self::new();
        for label in iter {
            tally.add(label.as_ref());
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let tally: EmotionTally = ["medo", "melancolia", "mistério", "angústia", "solidão", "mistério"]
            .into_iter()
            .collect();

        assert_eq!(tally.count("mistério"), 2);
        assert_eq!(tally.count("medo"), 1);
        assert_eq!(tally.count("alegria"), 0);
        assert_eq!(tally.len(), 5);
        assert_eq!(tally.total(), 6);
        assert_eq!(tally.max_count(), 2);
    }

    #[test]
    fn test_most_common_ties_keep_first_seen_order() {
        let tally: EmotionTally = ["medo", "melancolia", "mistério", "angústia", "solidão", "mistério"]
            .into_iter()
            .collect();

        let top = tally.most_common(3);
        assert_eq!(top, vec![("mistério", 2), ("medo", 1), ("melancolia", 1)]);
    }

    #[test]
    fn test_most_common_shorter_than_requested() {
        let tally: EmotionTally = ["esperança"].into_iter().collect();
        assert_eq!(tally.most_common(5), vec![("esperança", 1)]);
        assert!(EmotionTally::new().most_common(3).is_empty());
    }
}
