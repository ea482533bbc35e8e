//! Minimal polyline for a short series, drawn in a fixed box.

use crate::config::SPARKLINE_PADDING;
use crate::utils::px;

/// `points` attribute of an SVG polyline for `values` in a `width × height` box.
///
/// Values are spread evenly left to right and scaled to their own min/max.
/// A single value is drawn at the horizontal center; a flat series runs
/// along the bottom.
pub fn sparkline_points(values: &[f64], width: f64, height: f64) -> String {
    if values.is_empty() {
        return String::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };

    let inner_width = (width - SPARKLINE_PADDING * 2.0).max(0.0);
    let inner_height = (height - SPARKLINE_PADDING * 2.0).max(0.0);
    let count = values.len();

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = if count > 1 {
                SPARKLINE_PADDING + i as f64 / (count - 1) as f64 * inner_width
            } else {
                SPARKLINE_PADDING + inner_width / 2.0
            };
            let y = SPARKLINE_PADDING + inner_height - (value - min) / range * inner_height;
            format!("{},{}", px(x), px(y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
