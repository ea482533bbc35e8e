//! Pointer position → hovered category.

use crate::config::Margins;
use crate::scale::OrdinalScale;
use crate::Category;

/// Client-space position of the plot area's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotOrigin {
    pub x: f64,
    pub y: f64,
}

impl PlotOrigin {
    /// From the drawing surface's bounding rect and the axis margins.
    pub fn from_bounds(left: f64, top: f64, margins: &Margins) -> Self {
        Self {
            x: left + margins.left,
            y: top + margins.top,
        }
    }

    pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.x, client_y - self.y)
    }
}

/// Category whose x position is nearest the pointer, the synthetic start excluded.
///
/// There is no dead zone: any pointer over the surface resolves to some
/// category. Ties go to the first category in `categories` order.
/// Returns `None` when there is nothing to resolve against.
pub fn resolve_category(
    pointer_x: f64,
    pointer_y: f64,
    origin: PlotOrigin,
    categories: &[Category],
    scale: &OrdinalScale,
) -> Option<Category> {
    let (x, y) = origin.to_local(pointer_x, pointer_y);
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let mut best: Option<(Category, f64)> = None;
    for &category in categories.iter().filter(|&&c| c != 0) {
        let Some(position) = scale.position(category) else {
            continue;
        };
        let distance = (position - x).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((category, distance)),
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scale() -> OrdinalScale {
        // 0 → 0, 1 → 100, 2 → 200, 3 → 300
        OrdinalScale::new(&[0, 1, 2, 3], (0.0, 300.0))
    }

    #[test]
    fn margins_are_subtracted() {
        let margins = Margins {
            top: 10.0,
            right: 0.0,
            bottom: 0.0,
            left: 40.0,
        };
        let origin = PlotOrigin::from_bounds(100.0, 50.0, &margins);
        assert_eq!(origin.to_local(240.0, 60.0), (100.0, 0.0));

        let s = scale();
        // Local x 100 is exactly round 1.
        assert_eq!(resolve_category(240.0, 60.0, origin, s.categories(), &s), Some(1));
    }

    #[test]
    fn start_category_is_never_returned() {
        let s = scale();
        let hit = resolve_category(0.0, 0.0, PlotOrigin::default(), s.categories(), &s);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn pointer_outside_the_plot_still_resolves() {
        let s = scale();
        let origin = PlotOrigin::default();
        assert_eq!(resolve_category(-50.0, 0.0, origin, s.categories(), &s), Some(1));
        assert_eq!(resolve_category(900.0, 0.0, origin, s.categories(), &s), Some(3));
    }

    #[test]
    fn ties_go_to_the_first_category() {
        // 1 → 100, 2 → 200: x = 150 is equidistant.
        let s = OrdinalScale::new(&[0, 1, 2], (0.0, 200.0));
        let hit = resolve_category(150.0, 0.0, PlotOrigin::default(), s.categories(), &s);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn degenerate_inputs_resolve_to_none() {
        let s = OrdinalScale::new(&[0], (0.0, 300.0));
        assert_eq!(resolve_category(10.0, 0.0, PlotOrigin::default(), s.categories(), &s), None);

        let s = scale();
        assert_eq!(resolve_category(f64::NAN, 0.0, PlotOrigin::default(), s.categories(), &s), None);
        // Categories the scale does not know are skipped.
        assert_eq!(resolve_category(10.0, 0.0, PlotOrigin::default(), &[9], &s), None);
    }

    proptest! {
        #[test]
        fn nearest_category_wins(x in 0.0f64..300.0) {
            let s = scale();
            let hit = resolve_category(x, 0.0, PlotOrigin::default(), s.categories(), &s).unwrap();
            let hit_distance = (s.position(hit).unwrap() - x).abs();
            for c in 1..=3 {
                prop_assert!(hit_distance <= (s.position(c).unwrap() - x).abs());
            }
        }
    }
}
