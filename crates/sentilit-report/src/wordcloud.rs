// Frequency-weighted word clouds.
//
// Each label is one token, so multi-word emotions stay together. Words are
// placed largest first along an Archimedean spiral from the center; a word
// that finds no free spot is shrunk and retried, and dropped once it falls
// under the minimum size.

use crate::color::gradient;
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use sentilit_model::EmotionTally;
use std::path::Path;

pub const AUTHOR_CANVAS: (u32, u32) = (800, 400);
pub const OVERALL_CANVAS: (u32, u32) = (1200, 600);

const MIN_FONT: f64 = 12.0;
const SHRINK: f64 = 0.85;
const MARGIN: i32 = 4;
const SPIRAL_STEPS: usize = 4000;

/// A word with its final size and bounding box, in area pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub count: usize,
    pub font_size: f64,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PlacedWord {
    pub fn center(&self) -> (i32, i32) {
        (self.left + self.width / 2, self.top + self.height / 2)
    }

    pub fn overlaps(&self, other: &PlacedWord) -> bool {
        self.left < other.left + other.width
            && other.left < self.left + self.width
            && self.top < other.top + other.height
            && other.top < self.top + self.height
    }
}

/// Lay out the tally's labels on a `canvas`-sized area.
///
/// `measure` returns the pixel box of a word at a font size. Words come out
/// in placement order (highest count first) and never overlap each other or
/// the canvas edge.
pub fn layout_words<F, E>(tally: &EmotionTally, canvas: (u32, u32), mut measure: F) -> Result<Vec<PlacedWord>, E>
where
    F: FnMut(&str, f64) -> Result<(u32, u32), E>,
{
    let (width, height) = (canvas.0 as i32, canvas.1 as i32);
    let max_font = (canvas.1 as f64 / 5.0).max(MIN_FONT);
    let max_count = tally.max_count().max(1) as f64;
    let mut placed: Vec<PlacedWord> = Vec::new();

    for (word, count) in tally.most_common(tally.len()) {
        let mut font_size = MIN_FONT + (max_font - MIN_FONT) * count as f64 / max_count;

        loop {
            let (w, h) = measure(word, font_size)?;
            let candidate = PlacedWord {
                text: word.to_string(),
                count,
                font_size,
                left: 0,
                top: 0,
                width: w as i32,
                height: h as i32,
            };
            if let Some(spot) = find_spot(candidate, (width, height), &placed) {
                placed.push(spot);
                break;
            }

            font_size *= SHRINK;
            if font_size < MIN_FONT {
                tracing::debug!(word, "No room left in word cloud");
                break;
            }
        }
    }

    Ok(placed)
}

fn find_spot(mut word: PlacedWord, canvas: (i32, i32), placed: &[PlacedWord]) -> Option<PlacedWord> {
    let (width, height) = canvas;
    if word.width + 2 * MARGIN > width || word.height + 2 * MARGIN > height {
        return None;
    }

    // Flatten the spiral to the canvas aspect ratio
    let aspect = width as f64 / height as f64;
    for step in 0..SPIRAL_STEPS {
        let theta = step as f64 * 0.1;
        let r = 1.5 * theta;
        let cx = width as f64 / 2.0 + r * aspect * theta.cos();
        let cy = height as f64 / 2.0 + r * theta.sin();

        word.left = cx.round() as i32 - word.width / 2;
        word.top = cy.round() as i32 - word.height / 2;

        let inside = word.left >= MARGIN
            && word.top >= MARGIN
            && word.left + word.width <= width - MARGIN
            && word.top + word.height <= height - MARGIN;
        if inside && !placed.iter().any(|p| p.overlaps(&word)) {
            return Some(word);
        }
    }
    None
}

/// Most frequent words take the palette's first stop; rarer ones move along
/// it, stopping short of the lightest end, which vanishes on white.
pub fn word_color(palette: &[RGBColor], count: usize, max_count: usize) -> RGBColor {
    let share = if max_count == 0 { 0.0 } else { count as f64 / max_count as f64 };
    gradient(palette, 0.8 * (1.0 - share))
}

pub fn render(
    tally: &EmotionTally,
    title: &str,
    canvas: (u32, u32),
    palette: &[RGBColor],
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, canvas).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, ("sans-serif", 24))?;

    let words = layout_words(tally, area.dim_in_pixel(), |word, size| {
        let style = ("sans-serif", size).into_font().color(&BLACK);
        area.estimate_text_size(word, &style)
    })?;

    let max_count = tally.max_count();
    for word in &words {
        let color = word_color(palette, word.count, max_count);
        let style = ("sans-serif", word.font_size)
            .into_font()
            .color(&color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(word.text.clone(), word.center(), style))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::VIRIDIS;
    use std::convert::Infallible;

    fn measure(word: &str, size: f64) -> Result<(u32, u32), Infallible> {
        Ok(((word.chars().count() as f64 * size * 0.6) as u32, size as u32))
    }

    fn tally() -> EmotionTally {
        ["medo", "melancolia", "mistério", "angústia", "solidão", "mistério", "horror", "medo", "mistério"]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_places_every_word_without_overlap() {
        let words = layout_words(&tally(), AUTHOR_CANVAS, measure).unwrap();

        assert_eq!(words.len(), 6);
        for (i, a) in words.iter().enumerate() {
            assert!(a.left >= 0 && a.top >= 0);
            assert!(a.left + a.width <= AUTHOR_CANVAS.0 as i32);
            assert!(a.top + a.height <= AUTHOR_CANVAS.1 as i32);
            for b in &words[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn test_most_frequent_word_is_largest_and_central() {
        let words = layout_words(&tally(), AUTHOR_CANVAS, measure).unwrap();

        assert_eq!(words[0].text, "mistério");
        assert!(words[1..].iter().all(|w| w.font_size < words[0].font_size));
        assert_eq!(words[0].center(), (400, 200));
    }

    #[test]
    fn test_crowded_canvas_drops_words() {
        let labels: Vec<String> = (0..60).map(|i| format!("sentimento{i}")).collect();
        let crowded: EmotionTally = labels.iter().collect();

        let words = layout_words(&crowded, (200, 100), measure).unwrap();

        assert!(!words.is_empty());
        assert!(words.len() < 60);
        for (i, a) in words.iter().enumerate() {
            assert!(a.font_size >= MIN_FONT);
            assert!(words[i + 1..].iter().all(|b| !a.overlaps(b)));
        }
    }

    #[test]
    fn test_word_color_follows_count() {
        assert_eq!(word_color(&VIRIDIS, 3, 3), VIRIDIS[0]);
        assert_eq!(word_color(&VIRIDIS, 0, 3), gradient(&VIRIDIS, 0.8));
        assert_eq!(word_color(&VIRIDIS, 1, 1), word_color(&VIRIDIS, 2, 2));
        assert_ne!(word_color(&VIRIDIS, 1, 3), word_color(&VIRIDIS, 3, 3));
        assert_eq!(word_color(&VIRIDIS, 0, 0), gradient(&VIRIDIS, 0.8));
    }

    #[test]
    fn test_layout_keeps_counts() {
        let words = layout_words(&tally(), AUTHOR_CANVAS, measure).unwrap();
        let counts: Vec<(&str, usize)> = words.iter().map(|w| (w.text.as_str(), w.count)).collect();
        assert_eq!(counts[0], ("mistério", 3));
        assert_eq!(counts[1], ("medo", 2));
    }

    #[test]
    fn test_overlap_is_strict() {
        let word = |left, top| PlacedWord {
            text: "x".into(),
            count: 1,
            font_size: 12.0,
            left,
            top,
            width: 10,
            height: 10,
        };
        assert!(word(0, 0).overlaps(&word(5, 5)));
        assert!(!word(0, 0).overlaps(&word(10, 0)));
        assert!(!word(0, 0).overlaps(&word(0, 10)));
    }

    #[test]
    fn test_render_writes_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nuvem.svg");

        render(&tally(), "Emotions in the works of Edgar Allan Poe", AUTHOR_CANVAS, &VIRIDIS, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Edgar Allan Poe"));
        assert!(svg.contains("mistério"));
        assert!(svg.contains("solidão"));
    }
}
