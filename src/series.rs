//! Grouping raw observations into per-entity series.
//!
//! Every function here derives new values from its inputs; nothing is
//! mutated in place, so the same input always yields the same series.

use crate::{BoundaryOverride, Category, EntityId, Observation};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One entity's line: a synthetic category-0 point followed by its observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
    pub entity_id: EntityId,
    pub display_name: String,
    pub color: String,
    pub points: Vec<Observation>,
}

impl EntitySeries {
    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Value of the last point at or before `category`.
    pub fn value_at(&self, category: Category) -> Option<f64> {
        self.points
            .iter()
            .take_while(|p| p.category <= category)
            .last()
            .map(|p| p.value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Sorted distinct categories across all series, always including `0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryIndex {
    categories: Vec<Category>,
}

impl CategoryIndex {
    pub fn from_series(series: &[EntitySeries]) -> Self {
        let mut set: BTreeSet<Category> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.category))
            .collect();
        set.insert(0);
        Self {
            categories: set.into_iter().collect(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories that came from real data, i.e. everything but the start.
    pub fn played(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied().filter(|&c| c != 0)
    }

    pub fn max_category(&self) -> Category {
        self.categories.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played().next().is_none()
    }
}

/// Largest value over all points, after synthesis.
pub fn max_value(series: &[EntitySeries]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.value))
        .fold(0.0, f64::max)
}

/// Observations grouped per entity, entities in order of first appearance.
/// Within an entity the points are keyed by category; later duplicates win.
fn group_by_entity(observations: &[Observation]) -> Vec<BTreeMap<Category, &Observation>> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<BTreeMap<Category, &Observation>> = Vec::new();

    for obs in observations {
        if obs.category == 0 {
            debug!(
                "Discarding category 0 observation for {}; the start point is synthesized",
                obs.entity_id
            );
            continue;
        }
        let slot = *order.entry(obs.entity_id.as_str()).or_insert_with(|| {
            groups.push(BTreeMap::new());
            groups.len() - 1
        });
        groups[slot].insert(obs.category, obs);
    }

    groups
}

fn start_point(template: &Observation, value: f64) -> Observation {
    Observation {
        category: 0,
        value,
        ..template.clone()
    }
}

fn into_series(points: Vec<Observation>) -> Option<EntitySeries> {
    let last = points.last()?;
    Some(EntitySeries {
        entity_id: last.entity_id.clone(),
        display_name: last.display_name.clone(),
        color: last.color.clone(),
        points,
    })
}

/// Standings series: every line starts at `(0, 0)`.
pub fn build_series(observations: &[Observation]) -> Vec<EntitySeries> {
    group_by_entity(observations)
        .into_iter()
        .filter_map(|group| {
            let first = *group.values().next()?;
            let points = std::iter::once(start_point(first, 0.0))
                .chain(group.values().map(|&o| o.clone()))
                .collect();
            into_series(points)
        })
        .collect()
}

/// Position series: lap 0 is the grid slot, the last lap is the official result.
///
/// Without a starting rank the first recorded position stands in for the
/// grid. A finishing rank replaces the value of the last recorded lap.
/// Overrides for unknown entities are ignored.
pub fn build_position_series(
    observations: &[Observation],
    overrides: &[BoundaryOverride],
) -> Vec<EntitySeries> {
    let by_entity: HashMap<&str, &BoundaryOverride> = overrides
        .iter()
        .map(|o| (o.entity_id.as_str(), o))
        .collect();

    let series: Vec<EntitySeries> = group_by_entity(observations)
        .into_iter()
        .filter_map(|group| {
            let first = *group.values().next()?;
            let boundary = by_entity.get(first.entity_id.as_str());

            let start = boundary
                .and_then(|b| b.starting_rank)
                .unwrap_or(first.value);
            let mut points: Vec<Observation> = std::iter::once(start_point(first, start))
                .chain(group.values().map(|&o| o.clone()))
                .collect();

            if let Some(finish) = boundary.and_then(|b| b.finishing_rank) {
                if let Some(last) = points.last_mut() {
                    last.value = finish;
                }
            }
            into_series(points)
        })
        .collect();

    for o in overrides {
        if !series.iter().any(|s| s.entity_id == o.entity_id) {
            warn!("Ignoring boundary override for unknown entity {}", o.entity_id);
        }
    }

    series
}

/// Fill every index category an entity lacks with its previous cumulative value.
///
/// Rounds before the entity's first result carry the synthetic start, so a
/// late starter stays flat at 0 until it scores.
pub fn carry_forward(series: &[EntitySeries], index: &CategoryIndex) -> Vec<EntitySeries> {
    series
        .iter()
        .map(|s| {
            let mut points: Vec<Observation> = Vec::with_capacity(index.len());
            let mut cursor = s.points.iter().peekable();
            let mut previous: Option<&Observation> = None;

            for category in index.categories().iter().copied() {
                match cursor.peek() {
                    Some(p) if p.category == category => {
                        points.push((*p).clone());
                        previous = cursor.next();
                    }
                    _ => {
                        if let Some(prev) = previous {
                            points.push(Observation {
                                category,
                                ..prev.clone()
                            });
                        }
                    }
                }
            }

            EntitySeries {
                points,
                ..s.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obs(entity: &str, category: Category, value: f64) -> Observation {
        Observation {
            entity_id: entity.to_string(),
            category,
            value,
            color: "#FF0000".to_string(),
            display_name: entity.to_uppercase(),
        }
    }

    fn pairs(series: &EntitySeries) -> Vec<(Category, f64)> {
        series.points.iter().map(|p| (p.category, p.value)).collect()
    }

    #[test]
    fn standings_lines_start_at_origin() {
        let series = build_series(&[obs("a", 1, 10.0), obs("a", 2, 25.0)]);
        assert_eq!(series.len(), 1);
        assert_eq!(pairs(&series[0]), vec![(0, 0.0), (1, 10.0), (2, 25.0)]);
        assert_eq!(series[0].display_name, "A");
        assert_eq!(series[0].points[0].color, "#FF0000");
    }

    #[test]
    fn points_are_sorted_and_duplicates_last_write_wins() {
        let series = build_series(&[obs("a", 3, 30.0), obs("a", 1, 10.0), obs("a", 1, 12.0)]);
        assert_eq!(pairs(&series[0]), vec![(0, 0.0), (1, 12.0), (3, 30.0)]);
    }

    #[test]
    fn entities_keep_first_appearance_order() {
        let series = build_series(&[obs("b", 1, 1.0), obs("a", 1, 2.0), obs("b", 2, 3.0)]);
        let ids: Vec<&str> = series.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn late_starters_still_begin_at_zero() {
        let series = build_series(&[obs("a", 1, 5.0), obs("b", 3, 8.0)]);
        assert_eq!(pairs(&series[1]), vec![(0, 0.0), (3, 8.0)]);
    }

    #[test]
    fn empty_input_yields_no_series() {
        assert!(build_series(&[]).is_empty());
        assert!(CategoryIndex::from_series(&[]).is_empty());
    }

    #[test]
    fn raw_category_zero_is_discarded() {
        let series = build_series(&[obs("a", 0, 99.0), obs("a", 1, 4.0)]);
        assert_eq!(pairs(&series[0]), vec![(0, 0.0), (1, 4.0)]);
        // An entity with only a category 0 row has no real observations.
        assert!(build_series(&[obs("b", 0, 1.0)]).is_empty());
    }

    #[test]
    fn finishing_rank_replaces_last_lap() {
        let overrides = [BoundaryOverride {
            entity_id: "a".into(),
            starting_rank: None,
            finishing_rank: Some(3.0),
        }];
        let series = build_position_series(&[obs("a", 1, 10.0), obs("a", 2, 25.0)], &overrides);
        assert_eq!(pairs(&series[0]), vec![(0, 10.0), (1, 10.0), (2, 3.0)]);
    }

    #[test]
    fn starting_rank_becomes_lap_zero() {
        let overrides = [BoundaryOverride {
            entity_id: "a".into(),
            starting_rank: Some(7.0),
            finishing_rank: None,
        }];
        let series = build_position_series(&[obs("a", 1, 5.0), obs("a", 2, 4.0)], &overrides);
        assert_eq!(pairs(&series[0]), vec![(0, 7.0), (1, 5.0), (2, 4.0)]);
    }

    #[test]
    fn overrides_can_raise_max_rank() {
        let overrides = [BoundaryOverride {
            entity_id: "a".into(),
            starting_rank: Some(20.0),
            finishing_rank: None,
        }];
        let series = build_position_series(&[obs("a", 1, 5.0)], &overrides);
        assert_eq!(max_value(&series), 20.0);
    }

    #[test]
    fn unknown_and_negative_overrides() {
        let overrides = [
            BoundaryOverride {
                entity_id: "ghost".into(),
                starting_rank: Some(1.0),
                finishing_rank: Some(1.0),
            },
            BoundaryOverride {
                entity_id: "a".into(),
                starting_rank: None,
                finishing_rank: Some(-1.0),
            },
        ];
        let series = build_position_series(&[obs("a", 1, 2.0)], &overrides);
        assert_eq!(series.len(), 1);
        assert_eq!(pairs(&series[0]), vec![(0, 2.0), (1, -1.0)]);
    }

    #[test]
    fn category_index_includes_start() {
        let series = build_series(&[obs("a", 2, 1.0), obs("b", 5, 1.0)]);
        let index = CategoryIndex::from_series(&series);
        assert_eq!(index.categories(), &[0, 2, 5]);
        assert_eq!(index.played().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(index.max_category(), 5);
    }

    #[test]
    fn value_at_uses_last_point_at_or_before() {
        let series = build_series(&[obs("a", 1, 10.0), obs("a", 3, 30.0)]);
        assert_eq!(series[0].value_at(2), Some(10.0));
        assert_eq!(series[0].value_at(3), Some(30.0));
        assert_eq!(series[0].value_at(0), Some(0.0));
    }

    #[test]
    fn carry_forward_fills_skipped_rounds() {
        let series = build_series(&[
            obs("a", 1, 10.0),
            obs("a", 2, 18.0),
            obs("a", 3, 25.0),
            obs("b", 2, 6.0),
            obs("b", 4, 12.0),
            obs("a", 4, 40.0),
        ]);
        let index = CategoryIndex::from_series(&series);
        let filled = carry_forward(&series, &index);

        assert_eq!(pairs(&filled[0]), pairs(&series[0]));
        assert_eq!(
            pairs(&filled[1]),
            vec![(0, 0.0), (1, 0.0), (2, 6.0), (3, 6.0), (4, 12.0)]
        );
        // The input is left untouched.
        assert_eq!(series[1].points.len(), 3);
    }

    #[test]
    fn carry_forward_keeps_late_starters_flat_at_zero() {
        let series = build_series(&[
            obs("a", 1, 4.0),
            obs("a", 2, 9.0),
            obs("a", 3, 15.0),
            obs("b", 3, 8.0),
        ]);
        let index = CategoryIndex::from_series(&series);
        let filled = carry_forward(&series, &index);

        assert_eq!(
            pairs(&filled[1]),
            vec![(0, 0.0), (1, 0.0), (2, 0.0), (3, 8.0)]
        );
        assert!(filled.iter().all(|s| s.points.len() == index.len()));
    }

    proptest! {
        #[test]
        fn synthesis_is_repeatable(
            rows in prop::collection::vec((0usize..4, 1u32..12, 0.0f64..500.0), 0..40)
        ) {
            let entities = ["a", "b", "c", "d"];
            let input: Vec<Observation> = rows
                .iter()
                .map(|&(e, c, v)| obs(entities[e], c, v))
                .collect();
            prop_assert_eq!(build_series(&input), build_series(&input));
            prop_assert_eq!(
                build_position_series(&input, &[]),
                build_position_series(&input, &[])
            );
        }

        #[test]
        fn every_series_starts_at_category_zero(
            rows in prop::collection::vec((0usize..3, 1u32..8, 0.0f64..100.0), 1..30)
        ) {
            let entities = ["a", "b", "c"];
            let input: Vec<Observation> = rows
                .iter()
                .map(|&(e, c, v)| obs(entities[e], c, v))
                .collect();
            for s in build_series(&input) {
                prop_assert_eq!(s.points[0].category, 0);
                prop_assert_eq!(s.points[0].value, 0.0);
                prop_assert!(s.points.windows(2).all(|w| w[0].category < w[1].category));
            }
        }
    }
}
