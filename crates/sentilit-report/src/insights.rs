use crate::aggregate::Aggregates;
use sentilit_model::EmotionTally;
use std::fmt::Write;

pub const AUTHOR_TOP: usize = 3;
pub const OVERVIEW_TOP: usize = 5;

/// Plain-text insights report: one block per author in sorted order, then a
/// global overview. Rankings list only the emotions that exist.
pub fn render(aggregates: &Aggregates, generated_at: &str) -> String {
    let mut sections = vec![format!("Generated: {generated_at}")];

    for (author, aggregate) in &aggregates.authors {
        let mut block = String::new();
        let _ = writeln!(block, "AUTHOR: {}", author.to_uppercase());
        let _ = writeln!(block, "Works analyzed: {}", aggregate.titles.join(", "));
        let _ = writeln!(block, "Top {AUTHOR_TOP} emotions:");
        push_ranking(&mut block, &aggregate.tally(), AUTHOR_TOP);
        sections.push(block.trim_end().to_string());
    }

    let mut overview = String::new();
    let _ = writeln!(overview, "OVERVIEW:");
    let _ = writeln!(overview, "Most frequent emotions across all works:");
    push_ranking(&mut overview, &aggregates.overall_tally(), OVERVIEW_TOP);
    sections.push(overview.trim_end().to_string());

    let mut text = sections.join("\n\n");
    text.push('\n');
    text
}

fn push_ranking(out: &mut String, tally: &EmotionTally, n: usize) {
    let top = tally.most_common(n);
    if top.is_empty() {
        let _ = writeln!(out, "(no emotions labeled)");
        return;
    }
    for (rank, (emotion, count)) in top.into_iter().enumerate() {
        let noun = if count == 1 { "occurrence" } else { "occurrences" };
        let _ = writeln!(out, "{}. {emotion} ({count} {noun})", rank + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentilit_model::Book;

    #[test]
    fn test_author_block_ranks_by_count() {
        let books = vec![
            Book::new("Edgar Allan Poe", "O Gato Preto").with_emotions(["medo", "melancolia", "mistério"]),
            Book::new("Edgar Allan Poe", "O Corvo").with_emotions(["angústia", "solidão", "mistério"]),
        ];
        let text = render(&Aggregates::from_books(&books), "2026-10-19 12:00:00 +00:00");

        let expected = "\
Generated: 2026-10-19 12:00:00 +00:00

AUTHOR: EDGAR ALLAN POE
Works analyzed: O Gato Preto, O Corvo
Top 3 emotions:
1. mistério (2 occurrences)
2. medo (1 occurrence)
3. melancolia (1 occurrence)

OVERVIEW:
Most frequent emotions across all works:
1. mistério (2 occurrences)
2. medo (1 occurrence)
3. melancolia (1 occurrence)
4. angústia (1 occurrence)
5. solidão (1 occurrence)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_short_rankings_are_not_padded() {
        let books = vec![
            Book::new("Irmãos Grimm", "João e Maria").with_emotions(["medo"]),
            Book::new("William Shakespeare", "Hamlet"),
        ];
        let text = render(&Aggregates::from_books(&books), "now");

        assert!(text.contains("Top 3 emotions:\n1. medo (1 occurrence)\n\nAUTHOR: WILLIAM SHAKESPEARE"));
        assert!(text.contains("Works analyzed: Hamlet\nTop 3 emotions:\n(no emotions labeled)"));
        assert!(!text.contains("2. "));
    }

    #[test]
    fn test_overview_without_emotions() {
        let books = vec![Book::new("Agatha Christie", "Morte no Nilo")];
        let text = render(&Aggregates::from_books(&books), "now");
        assert!(text.ends_with("OVERVIEW:\nMost frequent emotions across all works:\n(no emotions labeled)\n"));
    }
}
