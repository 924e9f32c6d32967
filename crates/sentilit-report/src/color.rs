use plotters::style::RGBColor;

/// Sequential yellow → orange → red scale for the heatmap.
pub const YL_OR_RD: [RGBColor; 5] = [
    RGBColor(255, 255, 204),
    RGBColor(254, 217, 118),
    RGBColor(253, 141, 60),
    RGBColor(227, 26, 28),
    RGBColor(128, 0, 38),
];

pub const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

pub const PLASMA: [RGBColor; 5] = [
    RGBColor(13, 8, 135),
    RGBColor(126, 3, 168),
    RGBColor(204, 71, 120),
    RGBColor(248, 149, 64),
    RGBColor(240, 249, 33),
];

/// Distinct series colors, cycled by index.
pub const CATEGORY: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Linear interpolation along `stops`; `t` is clamped to `[0, 1]`.
pub fn gradient(stops: &[RGBColor], t: f64) -> RGBColor {
    match stops {
        [] => RGBColor(0, 0, 0),
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            let frac = scaled - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
        }
    }
}

pub fn series_color(index: usize) -> RGBColor {
    CATEGORY[index % CATEGORY.len()]
}

/// Relative luminance in `[0, 1]`, for choosing a readable text color.
pub fn luminance(c: RGBColor) -> f64 {
    (0.299 * c.0 as f64 + 0.587 * c.1 as f64 + 0.114 * c.2 as f64) / 255.0
}
