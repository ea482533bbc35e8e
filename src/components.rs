//! Yew view components for the standings dashboard.
//!
//! Charts and tables are controlled components: they receive an
//! [`InteractionState`] snapshot and emit hover/toggle/reset intents, but
//! never hold interaction state of their own.

use crate::config::{
    ChartStyle, DEFAULT_CHART_HEIGHT, POSITION_MARGINS, SPARKLINE_HEIGHT, SPARKLINE_WIDTH,
    STANDINGS_MARGINS,
};
use crate::interaction::InteractionState;
use crate::paint::{
    position_scene, standings_scene, table_rows, ChartScene, EntityPaint, PlotSize, RowOrder,
};
use crate::pointer::{resolve_category, PlotOrigin};
use crate::series::EntitySeries;
use crate::sparkline::sparkline_points;
use crate::utils::{format_points, format_rank, px};
use crate::{Category, CategoryInfo, EntityId};
use std::rc::Rc;
use web_sys::Element;
use yew::prelude::*;

/// Shown instead of a chart when there is no data.
#[derive(Properties, PartialEq)]
pub struct EmptyChartProps {
    pub message: AttrValue,
}

#[function_component(EmptyChart)]
pub fn empty_chart(props: &EmptyChartProps) -> Html {
    html! {
        <div class="chart-empty">
            <p class="no-results-message">{ props.message.clone() }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SparklineProps {
    pub values: Vec<f64>,
    pub color: AttrValue,
    #[prop_or(SPARKLINE_WIDTH)]
    pub width: f64,
    #[prop_or(SPARKLINE_HEIGHT)]
    pub height: f64,
}

/// Tiny trend line; no axes, no interaction.
#[function_component(Sparkline)]
pub fn sparkline(props: &SparklineProps) -> Html {
    html! {
        <svg class="sparkline" width={px(props.width)} height={px(props.height)}>
            <polyline
                points={sparkline_points(&props.values, props.width, props.height)}
                fill="none"
                stroke={props.color.clone()}
                stroke-width="1.5"
            />
        </svg>
    }
}

/// Props for the shared drawing surface.
#[derive(Properties, PartialEq)]
pub struct PlotSurfaceProps {
    pub scene: Rc<ChartScene>,
    pub on_hover_entity: Callback<Option<EntityId>>,
    pub on_toggle_entity: Callback<EntityId>,
    pub on_hover_category: Callback<Option<Category>>,
    pub on_clear_hover: Callback<()>,
}

/// Renders a [`ChartScene`] and turns pointer input back into intents.
///
/// Pointer moves anywhere on the surface resolve to the nearest category.
/// Entity hover comes from each line's invisible hit path instead, so the
/// two hovers never interfere. Leaving the surface clears both.
#[function_component(PlotSurface)]
pub fn plot_surface(props: &PlotSurfaceProps) -> Html {
    let svg_ref = use_node_ref();
    let scene = props.scene.clone();
    let margins = scene.size.margins;
    let inner_width = scene.size.inner_width();
    let inner_height = scene.size.inner_height();

    let onmousemove = {
        let svg_ref = svg_ref.clone();
        let scene = scene.clone();
        let on_hover_category = props.on_hover_category.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(svg) = svg_ref.cast::<Element>() else {
                return;
            };
            let rect = svg.get_bounding_client_rect();
            let origin = PlotOrigin::from_bounds(rect.left(), rect.top(), &scene.size.margins);
            let category = resolve_category(
                e.client_x() as f64,
                e.client_y() as f64,
                origin,
                scene.x_scale.categories(),
                &scene.x_scale,
            );
            on_hover_category.emit(category);
        })
    };

    let onmouseleave = props.on_clear_hover.reform(|_: MouseEvent| ());

    html! {
        <svg
            ref={svg_ref}
            class="chart-surface"
            width={px(scene.size.width)}
            height={px(scene.size.height)}
            viewBox={format!("0 0 {} {}", px(scene.size.width), px(scene.size.height))}
            {onmousemove}
            {onmouseleave}
        >
            <g transform={format!("translate({},{})", px(margins.left), px(margins.top))}>
                // Transparent backdrop so the whole plot area receives pointer moves
                <rect class="chart-backdrop" width={px(inner_width)} height={px(inner_height)} fill="transparent" />

                { for scene.grid.iter().map(|line| html! {
                    <g class="chart-grid">
                        <line x1="0" x2={px(inner_width)} y1={px(line.y)} y2={px(line.y)} />
                        <text x="-8" y={px(line.y)} text-anchor="end" dominant-baseline="middle">
                            { line.label.clone() }
                        </text>
                    </g>
                }) }

                { for scene.ticks.iter().map(|tick| html! {
                    <g
                        class="chart-tick"
                        opacity={tick.opacity.to_string()}
                        transform={format!("translate({},{})", px(tick.x), px(inner_height))}
                    >
                        if let Some(flag) = &tick.flag {
                            <circle class="chart-flag" cy="18" r="10" />
                            <text class="chart-flag-glyph" y="18" text-anchor="middle" dominant-baseline="central">
                                { flag.clone() }
                            </text>
                            <text y="42" text-anchor="middle">{ tick.label.clone() }</text>
                        } else {
                            <text y="18" text-anchor="middle">{ tick.label.clone() }</text>
                        }
                    </g>
                }) }

                if let Some(x) = scene.reference_x {
                    <line class="chart-reference" x1={px(x)} x2={px(x)} y1="0" y2={px(inner_height)} />
                }

                { for scene.entities.iter().map(render_line) }

                { for scene.entities.iter().map(|entity| {
                    render_hit_path(entity, scene.hit_stroke_width, &props.on_hover_entity, &props.on_toggle_entity)
                }) }
            </g>
        </svg>
    }
}

fn render_line(entity: &EntityPaint) -> Html {
    html! {
        <g key={entity.entity_id.clone()} class="chart-line">
            <path
                d={entity.solid_path.clone()}
                fill="none"
                stroke={entity.color.clone()}
                stroke-width={px(entity.stroke_width)}
                stroke-opacity={entity.opacity.to_string()}
                stroke-linejoin="round"
                stroke-linecap="round"
            />
            if let Some(faded) = &entity.faded {
                <path
                    d={faded.path.clone()}
                    fill="none"
                    stroke={entity.color.clone()}
                    stroke-width={px(entity.stroke_width)}
                    stroke-opacity={faded.opacity.to_string()}
                    stroke-linejoin="round"
                    stroke-linecap="round"
                />
            }
            if let Some(label) = &entity.label {
                <text
                    class="chart-end-label"
                    x={px(label.x)}
                    y={px(label.y)}
                    fill={entity.color.clone()}
                    opacity={label.opacity.to_string()}
                    font-weight={if label.bold { "700" } else { "400" }}
                    dominant-baseline="middle"
                >
                    { label.text.clone() }
                </text>
            }
        </g>
    }
}

fn render_hit_path(
    entity: &EntityPaint,
    width: f64,
    on_hover_entity: &Callback<Option<EntityId>>,
    on_toggle_entity: &Callback<EntityId>,
) -> Html {
    let onmouseenter = {
        let id = entity.entity_id.clone();
        on_hover_entity.reform(move |_: MouseEvent| Some(id.clone()))
    };
    let onmouseleave = on_hover_entity.reform(|_: MouseEvent| None);
    let onclick = {
        let id = entity.entity_id.clone();
        on_toggle_entity.reform(move |_: MouseEvent| id.clone())
    };

    html! {
        <path
            key={format!("hit-{}", entity.entity_id)}
            class="chart-hit-path"
            d={entity.hit_path.clone()}
            fill="none"
            stroke="transparent"
            stroke-width={px(width)}
            pointer-events="stroke"
            {onmouseenter}
            {onmouseleave}
            {onclick}
        />
    }
}

/// Props shared by both charts.
#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub series: Rc<Vec<EntitySeries>>,
    pub state: InteractionState,
    pub width: f64,
    #[prop_or(DEFAULT_CHART_HEIGHT)]
    pub height: f64,
    #[prop_or_default]
    pub style: ChartStyle,
    pub on_hover_entity: Callback<Option<EntityId>>,
    pub on_toggle_entity: Callback<EntityId>,
    pub on_hover_category: Callback<Option<CategoryInfo>>,
    pub on_clear_hover: Callback<()>,
    /// Meeting metadata per round; unused by the position chart.
    #[prop_or_default]
    pub rounds: Rc<Vec<CategoryInfo>>,
}

/// Cumulative championship points per round.
#[function_component(StandingsChart)]
pub fn standings_chart(props: &ChartProps) -> Html {
    let size = PlotSize {
        width: props.width,
        height: props.height,
        margins: STANDINGS_MARGINS,
    };
    let Some(scene) = standings_scene(&props.series, &props.rounds, &props.state, size, &props.style)
    else {
        return html! { <EmptyChart message="No standings to display" /> };
    };

    let on_hover_category = {
        let rounds = props.rounds.clone();
        props.on_hover_category.reform(move |category: Option<Category>| {
            category.map(|c| {
                rounds
                    .iter()
                    .find(|r| r.category == c)
                    .cloned()
                    .unwrap_or_else(|| CategoryInfo::bare(c))
            })
        })
    };

    html! {
        <PlotSurface
            scene={Rc::new(scene)}
            on_hover_entity={props.on_hover_entity.clone()}
            on_toggle_entity={props.on_toggle_entity.clone()}
            {on_hover_category}
            on_clear_hover={props.on_clear_hover.clone()}
        />
    }
}

/// Race position per lap, grid slot at lap 0 and classified result at the end.
#[function_component(PositionChart)]
pub fn position_chart(props: &ChartProps) -> Html {
    let size = PlotSize {
        width: props.width,
        height: props.height,
        margins: POSITION_MARGINS,
    };
    let Some(scene) = position_scene(&props.series, &props.state, size, &props.style) else {
        return html! { <EmptyChart message="No lap positions to display" /> };
    };

    let on_hover_category = props.on_hover_category.reform(|lap: Option<Category>| {
        lap.map(|lap| CategoryInfo {
            short_name: Some(format!("Lap {}", lap)),
            ..CategoryInfo::bare(lap)
        })
    });

    html! {
        <PlotSurface
            scene={Rc::new(scene)}
            on_hover_entity={props.on_hover_entity.clone()}
            on_toggle_entity={props.on_toggle_entity.clone()}
            {on_hover_category}
            on_clear_hover={props.on_clear_hover.clone()}
        />
    }
}

/// Props shared by both tables.
#[derive(Properties, PartialEq)]
pub struct TableProps {
    pub series: Rc<Vec<EntitySeries>>,
    pub state: InteractionState,
    #[prop_or_default]
    pub style: ChartStyle,
    pub on_hover_entity: Callback<Option<EntityId>>,
    pub on_toggle_entity: Callback<EntityId>,
    /// Bound to the header; the only way back to "all visible".
    pub on_reset_selection: Callback<()>,
}

fn row_handlers(
    props: &TableProps,
    entity_id: &str,
) -> (Callback<MouseEvent>, Callback<MouseEvent>, Callback<MouseEvent>) {
    let hover_id = entity_id.to_string();
    let toggle_id = entity_id.to_string();
    (
        props
            .on_hover_entity
            .reform(move |_: MouseEvent| Some(hover_id.clone())),
        props.on_hover_entity.reform(|_: MouseEvent| None),
        props
            .on_toggle_entity
            .reform(move |_: MouseEvent| toggle_id.clone()),
    )
}

/// Standings table linked to the standings chart.
///
/// Rows follow the hovered round: points and order are as of that round.
#[function_component(StandingsTable)]
pub fn standings_table(props: &TableProps) -> Html {
    let rows = table_rows(&props.series, &props.state, RowOrder::HighestFirst, &props.style);
    if rows.is_empty() {
        return html! {};
    }
    let onclick = props.on_reset_selection.reform(|_: MouseEvent| ());

    html! {
        <table class="standings-table">
            <thead {onclick} title="Click to show all drivers">
                <tr>
                    <th>{ "Pos" }</th>
                    <th>{ "Driver" }</th>
                    <th>{ "Points" }</th>
                    <th>{ "Trend" }</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|row| {
                    let (onmouseenter, onmouseleave, onclick) = row_handlers(props, &row.entity_id);
                    html! {
                        <tr
                            key={row.entity_id.clone()}
                            class={classes!("standings-row", row.selected.then_some("selected"), row.emphasized.then_some("emphasized"))}
                            style={format!("opacity: {}", row.opacity)}
                            {onmouseenter}
                            {onmouseleave}
                            {onclick}
                        >
                            <td>{ row.position.to_string() }</td>
                            <td>
                                <span class="team-swatch" style={format!("background: {}", row.color)}></span>
                                { row.display_name.clone() }
                            </td>
                            <td>{ format_points(row.value) }</td>
                            <td><Sparkline values={row.history.clone()} color={row.color.clone()} /></td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

/// Grid-to-finish table linked to the position chart.
#[function_component(ClassificationTable)]
pub fn classification_table(props: &TableProps) -> Html {
    let rows = table_rows(&props.series, &props.state, RowOrder::LowestFirst, &props.style);
    if rows.is_empty() {
        return html! {};
    }
    let onclick = props.on_reset_selection.reform(|_: MouseEvent| ());

    html! {
        <table class="standings-table classification-table">
            <thead {onclick} title="Click to show all drivers">
                <tr>
                    <th>{ "Pos" }</th>
                    <th>{ "Driver" }</th>
                    <th>{ "Grid" }</th>
                    <th>{ "+/-" }</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|row| {
                    let (onmouseenter, onmouseleave, onclick) = row_handlers(props, &row.entity_id);
                    let gained = (row.start - row.value).round() as i64;
                    html! {
                        <tr
                            key={row.entity_id.clone()}
                            class={classes!("standings-row", row.selected.then_some("selected"), row.emphasized.then_some("emphasized"))}
                            style={format!("opacity: {}", row.opacity)}
                            {onmouseenter}
                            {onmouseleave}
                            {onclick}
                        >
                            <td>{ format_rank(row.value) }</td>
                            <td>
                                <span class="team-swatch" style={format!("background: {}", row.color)}></span>
                                { row.display_name.clone() }
                            </td>
                            <td>{ format_rank(row.start) }</td>
                            <td class={classes!(if gained > 0 { "gain" } else if gained < 0 { "loss" } else { "" })}>
                                { format!("{:+}", gained) }
                            </td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}
