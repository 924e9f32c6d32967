// Radar chart comparing authors over the shared emotion axes.
//
// Axes are evenly spaced by angle, starting at the top and proceeding
// clockwise, in the sorted emotion order. Each author is one closed polygon.

use crate::aggregate::Aggregates;
use crate::color::series_color;
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::TAU;
use std::path::Path;

const CANVAS: (u32, u32) = (1100, 900);
const CENTER: (i32, i32) = (430, 440);
const RADIUS: f64 = 320.0;
const MAX_RINGS: usize = 5;

/// Angle of each axis in radians, clockwise from the top.
pub fn axis_angles(axes: usize) -> Vec<f64> {
    (0..axes).map(|k| k as f64 / axes as f64 * TAU).collect()
}

/// Pixel position of `value` on the axis at `angle`, for a scale
/// topping out at `max` at `radius`.
pub fn radar_point(center: (i32, i32), radius: f64, angle: f64, value: f64, max: f64) -> (i32, i32) {
    let r = if max > 0.0 { radius * value / max } else { 0.0 };
    (
        center.0 + (r * angle.sin()).round() as i32,
        center.1 - (r * angle.cos()).round() as i32,
    )
}

/// Closed outline (first vertex repeated at the end) for one author's values.
pub fn polygon_vertices(values: &[usize], max: usize) -> Vec<(i32, i32)> {
    let angles = axis_angles(values.len());
    let mut vertices: Vec<(i32, i32)> = values
        .iter()
        .zip(&angles)
        .map(|(&v, &a)| radar_point(CENTER, RADIUS, a, v as f64, max as f64))
        .collect();
    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    vertices
}

/// Grid ring levels: every integer up to `max` when small, else evenly spread.
fn ring_levels(max: usize) -> Vec<f64> {
    if max <= MAX_RINGS {
        (1..=max).map(|l| l as f64).collect()
    } else {
        (1..=MAX_RINGS)
            .map(|i| max as f64 * i as f64 / MAX_RINGS as f64)
            .collect()
    }
}

pub fn render(aggregates: &Aggregates, path: &Path) -> Result<()> {
    let emotions = aggregates.emotion_axis();
    let authors = aggregates.author_names();
    let matrix = aggregates.frequency_matrix();
    let max = matrix.iter().flatten().copied().max().unwrap_or(0).max(1);
    let angles = axis_angles(emotions.len());

    let root = SVGBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled("Comparative emotional profile", ("sans-serif", 28))?;

    let grid = RGBColor(200, 200, 200);
    let tick = ("sans-serif", 12).into_font();
    for level in ring_levels(max) {
        let mut ring: Vec<(i32, i32)> = angles
            .iter()
            .map(|&a| radar_point(CENTER, RADIUS, a, level, max as f64))
            .collect();
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
        area.draw(&PathElement::new(ring, grid.stroke_width(1)))?;

        let (x, y) = radar_point(CENTER, RADIUS, 0.0, level, max as f64);
        area.draw(&Text::new(
            format_level(level),
            (x + 4, y),
            tick.color(&RGBColor(120, 120, 120)).pos(Pos::new(HPos::Left, VPos::Bottom)),
        ))?;
    }

    let label = ("sans-serif", 16).into_font();
    for (emotion, &angle) in emotions.iter().zip(&angles) {
        let outer = radar_point(CENTER, RADIUS, angle, 1.0, 1.0);
        area.draw(&PathElement::new(vec![CENTER, outer], grid.stroke_width(1)))?;

        let anchor = radar_point(CENTER, RADIUS + 18.0, angle, 1.0, 1.0);
        let h_pos = match angle.sin() {
            s if s > 0.1 => HPos::Left,
            s if s < -0.1 => HPos::Right,
            _ => HPos::Center,
        };
        let v_pos = match angle.cos() {
            c if c > 0.1 => VPos::Bottom,
            c if c < -0.1 => VPos::Top,
            _ => VPos::Center,
        };
        area.draw(&Text::new(
            emotion.to_string(),
            anchor,
            label.color(&BLACK).pos(Pos::new(h_pos, v_pos)),
        ))?;
    }

    for (i, values) in matrix.iter().enumerate() {
        let color = series_color(i);
        let outline = polygon_vertices(values, max);
        area.draw(&Polygon::new(outline.clone(), color.mix(0.1).filled()))?;
        area.draw(&PathElement::new(outline, color.stroke_width(2)))?;
    }

    // Legend, top right
    let legend_x = CENTER.0 + RADIUS as i32 + 140;
    for (i, author) in authors.iter().enumerate() {
        let y = 40 + i as i32 * 28;
        let color = series_color(i);
        area.draw(&Rectangle::new([(legend_x, y - 6), (legend_x + 24, y + 6)], color.filled()))?;
        area.draw(&Text::new(
            author.to_string(),
            (legend_x + 32, y),
            label.color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn format_level(level: f64) -> String {
    if level.fract() == 0.0 {
        format!("{}", level as u64)
    } else {
        format!("{level:.1}")
    }
}
