// Author × emotion frequency heatmap with count annotations.

use crate::aggregate::Aggregates;
use crate::color::{gradient, luminance, YL_OR_RD};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const CELL_WIDTH: i32 = 90;
const CELL_HEIGHT: i32 = 60;
const LEFT: i32 = 200;
const TOP: i32 = 30;
const BOTTOM: i32 = 160;
const RIGHT: i32 = 140;

/// Fill color of a cell holding `count`, on a scale topping out at `max`.
pub fn cell_color(count: usize, max: usize) -> RGBColor {
    if max == 0 {
        return YL_OR_RD[0];
    }
    gradient(&YL_OR_RD, count as f64 / max as f64)
}

pub fn render(aggregates: &Aggregates, path: &Path) -> Result<()> {
    let authors = aggregates.author_names();
    let emotions = aggregates.emotion_axis();
    let matrix = aggregates.frequency_matrix();
    let max = matrix.iter().flatten().copied().max().unwrap_or(0);

    let grid_width = CELL_WIDTH * emotions.len() as i32;
    let grid_height = CELL_HEIGHT * authors.len() as i32;
    let width = (LEFT + grid_width + RIGHT).max(600) as u32;
    let height = (TOP + grid_height + BOTTOM + 60) as u32;

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled("Emotion frequency by author", ("sans-serif", 28))?;

    let annotation = ("sans-serif", 18).into_font();
    let centered = Pos::new(HPos::Center, VPos::Center);

    for (row, counts) in matrix.iter().enumerate() {
        let y0 = TOP + row as i32 * CELL_HEIGHT;
        for (col, &count) in counts.iter().enumerate() {
            let x0 = LEFT + col as i32 * CELL_WIDTH;
            let fill = cell_color(count, max);
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL_WIDTH, y0 + CELL_HEIGHT)],
                fill.filled(),
            ))?;
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL_WIDTH, y0 + CELL_HEIGHT)],
                WHITE.stroke_width(1),
            ))?;

            let ink = if luminance(fill) < 0.5 { WHITE } else { BLACK };
            area.draw(&Text::new(
                count.to_string(),
                (x0 + CELL_WIDTH / 2, y0 + CELL_HEIGHT / 2),
                annotation.color(&ink).pos(centered),
            ))?;
        }
    }

    let label = ("sans-serif", 16).into_font();
    for (row, author) in authors.iter().enumerate() {
        let y = TOP + row as i32 * CELL_HEIGHT + CELL_HEIGHT / 2;
        area.draw(&Text::new(
            author.to_string(),
            (LEFT - 10, y),
            label.color(&BLACK).pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }

    let rotated = ("sans-serif", 16).into_font().transform(FontTransform::Rotate90);
    for (col, emotion) in emotions.iter().enumerate() {
        let x = LEFT + col as i32 * CELL_WIDTH + CELL_WIDTH / 2;
        area.draw(&Text::new(
            emotion.to_string(),
            (x, TOP + grid_height + 10),
            rotated.color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    let axis_title = ("sans-serif", 18).into_font();
    area.draw(&Text::new(
        "Emotions",
        (LEFT + grid_width / 2, TOP + grid_height + BOTTOM - 10),
        axis_title.color(&BLACK).pos(centered),
    ))?;
    area.draw(&Text::new(
        "Authors",
        (20, TOP + grid_height / 2),
        axis_title
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(centered),
    ))?;

    draw_color_bar(&area, LEFT + grid_width + 30, grid_height, max)?;

    root.present()?;
    Ok(())
}

fn draw_color_bar(area: &DrawingArea<SVGBackend<'_>, Shift>, x: i32, height: i32, max: usize) -> Result<()> {
    const BAR_WIDTH: i32 = 20;
    const STEPS: i32 = 50;

    let step_height = (height as f64 / STEPS as f64).max(1.0);
    for i in 0..STEPS {
        // Top of the bar is the maximum
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let y0 = TOP + (i as f64 * step_height) as i32;
        let y1 = TOP + ((i + 1) as f64 * step_height).ceil() as i32;
        area.draw(&Rectangle::new(
            [(x, y0), (x + BAR_WIDTH, y1.min(TOP + height))],
            gradient(&YL_OR_RD, t).filled(),
        ))?;
    }

    let tick = ("sans-serif", 14).into_font();
    let left_center = Pos::new(HPos::Left, VPos::Center);
    area.draw(&Text::new(
        max.to_string(),
        (x + BAR_WIDTH + 6, TOP),
        tick.color(&BLACK).pos(left_center),
    ))?;
    area.draw(&Text::new(
        "0",
        (x + BAR_WIDTH + 6, TOP + height),
        tick.color(&BLACK).pos(left_center),
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentilit_model::Book;

    #[test]
    fn test_cell_color_scale() {
        assert_eq!(cell_color(0, 4), YL_OR_RD[0]);
        assert_eq!(cell_color(4, 4), YL_OR_RD[4]);
        assert_eq!(cell_color(0, 0), YL_OR_RD[0]);
        assert!(luminance(cell_color(1, 4)) > luminance(cell_color(3, 4)));
    }

    #[test]
    fn test_render_writes_annotated_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.svg");
        let books = vec![
            Book::new("Edgar Allan Poe", "O Gato Preto").with_emotions(["medo", "mistério"]),
            Book::new("Edgar Allan Poe", "O Corvo").with_emotions(["mistério"]),
        ];

        render(&Aggregates::from_books(&books), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        let texts = text_nodes(&svg);
        assert!(texts.contains(&"Edgar Allan Poe"));
        assert!(texts.contains(&"medo"));
        // cell annotations: medo 1, mistério 2; color bar ends 0 and 2
        assert_eq!(texts.iter().filter(|t| **t == "2").count(), 2);
        assert_eq!(texts.iter().filter(|t| **t == "1").count(), 1);
    }

    /// Trimmed contents of every `<text>` element.
    fn text_nodes(svg: &str) -> Vec<&str> {
        svg.split("<text")
            .skip(1)
            .filter_map(|chunk| {
                let body = &chunk[chunk.find('>')? + 1..];
                Some(body[..body.find("</text>")?].trim())
            })
            .collect()
    }
}
