use crate::config::FALLBACK_COLOR;
use crate::DataError;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regex for team colors, with or without the leading '#'
static HEX_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").unwrap());

/// Normalize a hex color to `#RRGGBB`.
///
/// Accepts `3671C6`, `#3671c6` and the short `#36C` form.
pub fn normalize_color(input: &str) -> Result<String, DataError> {
    let trimmed = input.trim();
    let captures = HEX_COLOR_REGEX
        .captures(trimmed)
        .ok_or_else(|| DataError::InvalidColor(trimmed.to_string()))?;

    let digits = &captures[1];
    let full = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        digits.to_string()
    };
    Ok(format!("#{}", full.to_ascii_uppercase()))
}

/// Normalized color, or the neutral fallback when missing or malformed.
pub fn color_or_fallback(input: Option<&str>) -> String {
    match input {
        Some(raw) => normalize_color(raw).unwrap_or_else(|e| {
            warn!("{}", e);
            FALLBACK_COLOR.to_string()
        }),
        None => FALLBACK_COLOR.to_string(),
    }
}

/// Format a points total: whole numbers without decimals, half points with one.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Format a rank as `P3`.
pub fn format_rank(value: f64) -> String {
    format!("P{}", value.round() as i64)
}

/// Format a number for an SVG attribute.
pub fn px(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_normalized() {
        assert_eq!(normalize_color("3671C6").unwrap(), "#3671C6");
        assert_eq!(normalize_color("#e8002d").unwrap(), "#E8002D");
        assert_eq!(normalize_color(" #0f0 ").unwrap(), "#00FF00");
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert!(matches!(
            normalize_color("red"),
            Err(DataError::InvalidColor(c)) if c == "red"
        ));
        assert_eq!(color_or_fallback(Some("#12345")), FALLBACK_COLOR);
        assert_eq!(color_or_fallback(None), FALLBACK_COLOR);
    }

    #[test]
    fn points_and_ranks_format() {
        assert_eq!(format_points(25.0), "25");
        assert_eq!(format_points(12.5), "12.5");
        assert_eq!(format_rank(3.0), "P3");
        assert_eq!(px(1.0 / 3.0), "0.33");
    }
}
