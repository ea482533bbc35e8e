//! Scene building: everything a chart or table draws, as plain data.
//!
//! Components turn a [`ChartScene`] into SVG without making any styling
//! decisions of their own, so the whole paint step is testable without a
//! browser.

use crate::config::{
    ChartStyle, Margins, LABEL_OFFSET_PX, MAX_LAP_TICKS, POINTS_TICK_TARGET,
};
use crate::interaction::InteractionState;
use crate::scale::{LinearScale, OrdinalScale};
use crate::series::{max_value, CategoryIndex, EntitySeries};
use crate::utils::{format_points, format_rank, px};
use crate::{Category, CategoryInfo, EntityId, Observation};
use std::cmp::Ordering;

/// Outer size of the drawing surface, margins included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSize {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PlotSize {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTick {
    pub category: Category,
    pub x: f64,
    pub label: String,
    pub flag: Option<String>,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadedSegment {
    pub path: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub opacity: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityPaint {
    pub entity_id: EntityId,
    pub color: String,
    pub opacity: f64,
    pub stroke_width: f64,
    /// Line up to and including the hovered category (the whole line when none is).
    pub solid_path: String,
    /// Line after the hovered category, if there is one.
    pub faded: Option<FadedSegment>,
    /// Invisible wide stroke over the entire line, for hit testing.
    pub hit_path: String,
    pub label: Option<EndLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub size: PlotSize,
    pub x_scale: OrdinalScale,
    pub grid: Vec<GridLine>,
    pub ticks: Vec<CategoryTick>,
    pub entities: Vec<EntityPaint>,
    /// Vertical line at the hovered category, in plot coordinates.
    pub reference_x: Option<f64>,
    pub hit_stroke_width: f64,
}

/// SVG path data through `points`.
pub fn polyline_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{}{},{}", command, px(*x), px(*y))
        })
        .collect()
}

/// Split points at the hovered category.
///
/// The first slice runs up to and including the last point at or before
/// `hovered`; the second starts at that same point so the two halves join.
/// The second slice is `None` when nothing lies after `hovered`.
pub fn split_at_category(
    points: &[Observation],
    hovered: Category,
) -> (&[Observation], Option<&[Observation]>) {
    let Some(index) = points.iter().rposition(|p| p.category <= hovered) else {
        return (&[], Some(points));
    };
    let after = if index + 1 < points.len() {
        Some(&points[index..])
    } else {
        None
    };
    (&points[..=index], after)
}

fn project(points: &[Observation], x: &OrdinalScale, y: &LinearScale) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|p| Some((x.position(p.category)?, y.map(p.value))))
        .collect()
}

fn paint_entities(
    series: &[EntitySeries],
    x: &OrdinalScale,
    y: &LinearScale,
    state: &InteractionState,
    style: &ChartStyle,
    with_labels: bool,
) -> Vec<EntityPaint> {
    series
        .iter()
        .map(|s| {
            let id = s.entity_id.as_str();
            let opacity = state.opacity_for(id, style);
            let stroke_width = state.stroke_width_for(id, style);

            let (solid, faded) = match state.hovered_category {
                Some(hovered) => {
                    let (before, after) = split_at_category(&s.points, hovered);
                    let faded = after.map(|a| FadedSegment {
                        path: polyline_path(&project(a, x, y)),
                        opacity: state.after_segment_opacity(id, style),
                    });
                    (polyline_path(&project(before, x, y)), faded)
                }
                None => (polyline_path(&project(&s.points, x, y)), None),
            };

            let label = if with_labels {
                s.points.last().and_then(|last| {
                    Some(EndLabel {
                        x: x.position(last.category)? + LABEL_OFFSET_PX,
                        y: y.map(last.value),
                        text: s.display_name.clone(),
                        opacity,
                        bold: state.is_emphasized(id),
                    })
                })
            } else {
                None
            };

            EntityPaint {
                entity_id: s.entity_id.clone(),
                color: s.color.clone(),
                opacity,
                stroke_width,
                solid_path: solid,
                faded,
                hit_path: polyline_path(&project(&s.points, x, y)),
                label,
            }
        })
        .collect()
}

fn reference_x(state: &InteractionState, x: &OrdinalScale) -> Option<f64> {
    state.hovered_category.and_then(|c| x.position(c))
}

/// Cumulative standings chart. `None` when there is nothing to plot.
pub fn standings_scene(
    series: &[EntitySeries],
    rounds: &[CategoryInfo],
    state: &InteractionState,
    size: PlotSize,
    style: &ChartStyle,
) -> Option<ChartScene> {
    let index = CategoryIndex::from_series(series);
    if series.is_empty() || index.is_empty() {
        return None;
    }

    let x = OrdinalScale::new(index.categories(), (0.0, size.inner_width()));
    let y = LinearScale::for_points(max_value(series), size.inner_height(), POINTS_TICK_TARGET);

    let grid = y
        .ticks(POINTS_TICK_TARGET)
        .into_iter()
        .map(|v| GridLine {
            y: y.map(v),
            label: format_points(v),
        })
        .collect();

    let ticks = index
        .played()
        .filter_map(|category| {
            let info = rounds
                .iter()
                .find(|r| r.category == category)
                .cloned()
                .unwrap_or_else(|| CategoryInfo::bare(category));
            Some(CategoryTick {
                category,
                x: x.position(category)?,
                label: info.label(),
                flag: info.flag,
                opacity: state.flag_opacity(category, style),
            })
        })
        .collect();

    Some(ChartScene {
        size,
        grid,
        ticks,
        entities: paint_entities(series, &x, &y, state, style, false),
        reference_x: reference_x(state, &x),
        hit_stroke_width: style.hit_stroke_width,
        x_scale: x,
    })
}

/// Position-over-laps chart, with end labels. `None` when there is nothing to plot.
///
/// Maximum rank and lap count come from the synthesized series, so grid
/// slots and finishing overrides are accounted for.
pub fn position_scene(
    series: &[EntitySeries],
    state: &InteractionState,
    size: PlotSize,
    style: &ChartStyle,
) -> Option<ChartScene> {
    let index = CategoryIndex::from_series(series);
    if series.is_empty() || index.is_empty() {
        return None;
    }

    let max_rank = max_value(series).ceil();
    let x = OrdinalScale::new(index.categories(), (0.0, size.inner_width()));
    let y = LinearScale::for_ranks(max_rank, size.inner_height());

    let grid = y
        .integer_ticks()
        .into_iter()
        .map(|rank| GridLine {
            y: y.map(rank),
            label: format_rank(rank),
        })
        .collect();

    let stride = lap_tick_stride(index.max_category());
    let ticks = index
        .played()
        .filter(|lap| lap % stride == 0 || *lap == index.max_category() || *lap == 1)
        .filter_map(|lap| {
            Some(CategoryTick {
                category: lap,
                x: x.position(lap)?,
                label: lap.to_string(),
                flag: None,
                opacity: state.flag_opacity(lap, style),
            })
        })
        .collect();

    Some(ChartScene {
        size,
        grid,
        ticks,
        entities: paint_entities(series, &x, &y, state, style, true),
        reference_x: reference_x(state, &x),
        hit_stroke_width: style.hit_stroke_width,
        x_scale: x,
    })
}

fn lap_tick_stride(max_lap: Category) -> Category {
    let target = MAX_LAP_TICKS as Category;
    max_lap.div_ceil(target).max(1)
}

/// Which end of the value range leads the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    HighestFirst,
    LowestFirst,
}

/// One table row, styled from the same interaction state as the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub position: usize,
    pub entity_id: EntityId,
    pub display_name: String,
    pub color: String,
    pub start: f64,
    pub value: f64,
    pub history: Vec<f64>,
    pub opacity: f64,
    pub emphasized: bool,
    pub selected: bool,
}

/// Rows ordered by value at the hovered category, or the final value.
pub fn table_rows(
    series: &[EntitySeries],
    state: &InteractionState,
    order: RowOrder,
    style: &ChartStyle,
) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = series
        .iter()
        .filter_map(|s| {
            let value = match state.hovered_category {
                Some(category) => s.value_at(category)?,
                None => s.last_value()?,
            };
            let history = match state.hovered_category {
                Some(category) => s
                    .points
                    .iter()
                    .take_while(|p| p.category <= category)
                    .map(|p| p.value)
                    .collect(),
                None => s.values(),
            };
            let id = s.entity_id.as_str();
            Some(TableRow {
                position: 0,
                entity_id: s.entity_id.clone(),
                display_name: s.display_name.clone(),
                color: s.color.clone(),
                start: s.first_value().unwrap_or(value),
                value,
                history,
                opacity: state.opacity_for(id, style),
                emphasized: state.is_emphasized(id),
                selected: state.is_selected(id),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let by_value = match order {
            RowOrder::HighestFirst => b.value.total_cmp(&a.value),
            RowOrder::LowestFirst => a.value.total_cmp(&b.value),
        };
        match by_value {
            Ordering::Equal => a.display_name.cmp(&b.display_name),
            other => other,
        }
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = i + 1;
    }
    rows
}
