//! Category → x and value → y pixel mappings.
//!
//! Both scales are plain values rebuilt whenever the plot size changes;
//! only the pixel ranges depend on layout, never the data.

use crate::config::POINTS_HEADROOM;
use crate::Category;

/// Places categories at equal spacing across a pixel range, with no padding.
///
/// The first category sits exactly on `range.0` and the last on `range.1`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    categories: Vec<Category>,
    range: (f64, f64),
}

impl OrdinalScale {
    pub fn new(categories: &[Category], range: (f64, f64)) -> Self {
        let mut categories = categories.to_vec();
        categories.sort_unstable();
        categories.dedup();
        Self { categories, range }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between adjacent categories. Zero for fewer than two.
    pub fn step(&self) -> f64 {
        match self.categories.len() {
            0 | 1 => 0.0,
            n => (self.range.1 - self.range.0) / (n - 1) as f64,
        }
    }

    /// Pixel position of `category`, or `None` if it is not in the domain.
    pub fn position(&self, category: Category) -> Option<f64> {
        let index = self.categories.binary_search(&category).ok()?;
        let last = self.categories.len() - 1;
        if last == 0 {
            return Some(self.range.0);
        }
        // Interpolating from both ends keeps the endpoints exact.
        let t = index as f64 / last as f64;
        Some(self.range.0 * (1.0 - t) + self.range.1 * t)
    }
}

/// Linear map from a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// With `invert`, `domain.0` lands on `range.1` (values grow upward on screen).
    pub fn new(domain: (f64, f64), range: (f64, f64), invert: bool) -> Self {
        let range = if invert { (range.1, range.0) } else { range };
        Self { domain, range }
    }

    /// Points chart: `[0, nice(max * 1.1)]`, zero at the bottom of `height`.
    pub fn for_points(max_value: f64, height: f64, tick_target: usize) -> Self {
        let upper = nice_upper_bound(max_value * POINTS_HEADROOM, tick_target);
        Self::new((0.0, upper), (0.0, height), true)
    }

    /// Rank chart: `[1, max_rank]` with rank 1 at the top.
    pub fn for_ranks(max_rank: f64, height: f64) -> Self {
        Self::new((1.0, max_rank.max(1.0)), (0.0, height), false)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        // A constant series would otherwise produce NaN coordinates.
        let span = if span == 0.0 { 1.0 } else { span };
        self.range.0 + (value - self.domain.0) / span * (self.range.1 - self.range.0)
    }

    /// Round-number ticks covering the domain, roughly `target` of them.
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        let step = nice_step(hi - lo, target);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }

    /// One tick per whole number in the domain.
    pub fn integer_ticks(&self) -> Vec<f64> {
        let lo = self.domain.0.min(self.domain.1).ceil() as i64;
        let hi = self.domain.0.max(self.domain.1).floor() as i64;
        (lo..=hi).map(|i| i as f64).collect()
    }
}

/// 1, 2 or 5 times a power of ten, so that `span / step <= target`.
pub fn nice_step(span: f64, target: usize) -> f64 {
    let target = target.max(1) as f64;
    if !(span > 0.0) || !span.is_finite() {
        return 1.0;
    }
    let raw = span / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Smallest multiple of the nice step that is `>= value`. At least 1.
pub fn nice_upper_bound(value: f64, target: usize) -> f64 {
    if !(value > 0.0) || !value.is_finite() {
        return 1.0;
    }
    let step = nice_step(value, target);
    (value / step).ceil() * step
}
