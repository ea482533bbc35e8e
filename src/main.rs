//! Dashboard page for the standings charts using Yew.
//! Loads the embedded season data and wires each chart to its table.

use log::{info, warn};
use pitwall_charts::components::{
    ClassificationTable, PositionChart, StandingsChart, StandingsTable,
};
use pitwall_charts::config::{ChartStyle, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use pitwall_charts::hooks::{use_element_width, use_interaction};
use pitwall_charts::series::carry_forward;
use pitwall_charts::{
    build_position_series, build_series, read_positions_csv, read_standings_csv, Category,
    CategoryIndex, CategoryInfo, PositionData, StandingsData,
};
use std::rc::Rc;
use yew::prelude::*;

const STANDINGS_CSV: &str = include_str!("data/standings.csv");
const POSITIONS_CSV: &str = include_str!("data/positions.csv");
const CLASSIFICATION_CSV: &str = include_str!("data/classification.csv");

fn hovered_round_caption(hovered: Option<Category>, rounds: &[CategoryInfo]) -> String {
    let info = hovered.map(|c| {
        rounds
            .iter()
            .find(|r| r.category == c)
            .cloned()
            .unwrap_or_else(|| CategoryInfo::bare(c))
    });
    match info {
        Some(round) => {
            let name = round.name.clone().unwrap_or_else(|| round.label());
            match &round.flag {
                Some(flag) => format!("Round {}: {} {}", round.category, flag, name),
                None => format!("Round {}: {}", round.category, name),
            }
        }
        None => "Hover the chart to inspect a round".to_string(),
    }
}

fn selection_caption(count: usize) -> String {
    match count {
        0 => "Click a line or row to compare drivers".to_string(),
        1 => "1 driver selected, click the table header to show all".to_string(),
        n => format!("{} drivers selected, click the table header to show all", n),
    }
}

/// Championship standings card plus last race positions card.
#[function_component(Dashboard)]
fn dashboard() -> Html {
    let standings = use_state(|| Rc::new(StandingsData::default()));
    let positions = use_state(|| Rc::new(PositionData::default()));
    let style = ChartStyle::default();

    // Load the embedded data on mount
    {
        let standings = standings.clone();
        let positions = positions.clone();
        use_effect_with((), move |_| {
            match read_standings_csv(STANDINGS_CSV) {
                Ok(data) => standings.set(Rc::new(data)),
                Err(e) => warn!("Standings data unavailable: {}", e),
            }
            match read_positions_csv(POSITIONS_CSV, CLASSIFICATION_CSV) {
                Ok(data) => positions.set(Rc::new(data)),
                Err(e) => warn!("Lap position data unavailable: {}", e),
            }
        });
    }

    // Rounds an entity skipped carry its previous total.
    let standings_series = use_memo((*standings).clone(), |data| {
        let series = build_series(&data.observations);
        let index = CategoryIndex::from_series(&series);
        let filled = carry_forward(&series, &index);
        info!(
            "Standings: {} drivers over {} rounds",
            filled.len(),
            index.max_category()
        );
        filled
    });
    let rounds = use_memo((*standings).clone(), |data| data.rounds.clone());
    let position_series = use_memo((*positions).clone(), |data| {
        build_position_series(&data.observations, &data.overrides)
    });

    let standings_ix = use_interaction();
    let positions_ix = use_interaction();

    // Drop selections that no longer match a driver in the data.
    {
        let retain = standings_ix.retain_known.clone();
        use_effect_with(standings_series.clone(), move |series| {
            retain.emit(series.iter().map(|s| s.entity_id.clone()).collect());
        });
    }
    {
        let retain = positions_ix.retain_known.clone();
        use_effect_with(position_series.clone(), move |series| {
            retain.emit(series.iter().map(|s| s.entity_id.clone()).collect());
        });
    }

    let chart_ref = use_node_ref();
    let width = use_element_width(chart_ref.clone(), DEFAULT_CHART_WIDTH);

    let on_standings_category = standings_ix
        .on_hover_category
        .reform(|info: Option<CategoryInfo>| info.map(|round| round.category));
    let on_position_category = positions_ix
        .on_hover_category
        .reform(|info: Option<CategoryInfo>| info.map(|lap| lap.category));

    let lap_caption = match positions_ix.state.hovered_category {
        Some(lap) => format!("Lap {}", lap),
        None => "Grid to flag".to_string(),
    };

    html! {
        <div class="container">
            <section class="card">
                <header class="card-header">
                    <h2>{ "Driver standings" }</h2>
                    <span class="card-subtitle">{ hovered_round_caption(standings_ix.state.hovered_category, &rounds) }</span>
                </header>
                <div class="chart-section" ref={chart_ref}>
                    <StandingsChart
                        series={standings_series.clone()}
                        rounds={rounds.clone()}
                        state={standings_ix.state.clone()}
                        {width}
                        height={DEFAULT_CHART_HEIGHT}
                        {style}
                        on_hover_entity={standings_ix.on_hover_entity.clone()}
                        on_toggle_entity={standings_ix.on_toggle_entity.clone()}
                        on_hover_category={on_standings_category}
                        on_clear_hover={standings_ix.on_clear_hover.clone()}
                    />
                </div>
                <p class="selection-hint">
                    { selection_caption(standings_ix.state.selected_entities.len()) }
                </p>
                <StandingsTable
                    series={standings_series.clone()}
                    state={standings_ix.state.clone()}
                    {style}
                    on_hover_entity={standings_ix.on_hover_entity.clone()}
                    on_toggle_entity={standings_ix.on_toggle_entity.clone()}
                    on_reset_selection={standings_ix.on_reset_selection.clone()}
                />
            </section>

            <section class="card">
                <header class="card-header">
                    <h2>{ "Race positions" }</h2>
                    <span class="card-subtitle">{ lap_caption }</span>
                </header>
                <div class="chart-section">
                    <PositionChart
                        series={position_series.clone()}
                        state={positions_ix.state.clone()}
                        {width}
                        height={DEFAULT_CHART_HEIGHT}
                        {style}
                        on_hover_entity={positions_ix.on_hover_entity.clone()}
                        on_toggle_entity={positions_ix.on_toggle_entity.clone()}
                        on_hover_category={on_position_category}
                        on_clear_hover={positions_ix.on_clear_hover.clone()}
                    />
                </div>
                <ClassificationTable
                    series={position_series.clone()}
                    state={positions_ix.state.clone()}
                    {style}
                    on_hover_entity={positions_ix.on_hover_entity.clone()}
                    on_toggle_entity={positions_ix.on_toggle_entity.clone()}
                    on_reset_selection={positions_ix.on_reset_selection.clone()}
                />
            </section>
        </div>
    }
}

#[function_component]
pub fn App() -> Html {
    html! { <Dashboard /> }
}

/// Entry point: installs the panic hook and renders the dashboard.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_data_parses() {
        let standings = read_standings_csv(STANDINGS_CSV).unwrap();
        assert_eq!(standings.rounds.len(), 4);
        assert_eq!(standings.observations.len(), 16);

        let positions = read_positions_csv(POSITIONS_CSV, CLASSIFICATION_CSV).unwrap();
        assert_eq!(positions.overrides.len(), 4);
        let series = build_position_series(&positions.observations, &positions.overrides);
        assert!(series.iter().all(|s| s.points[0].category == 0));
    }

    #[test]
    fn round_caption_reads_the_hovered_category() {
        let rounds = vec![CategoryInfo {
            category: 2,
            name: Some("Saudi Arabian Grand Prix".into()),
            short_name: Some("Saudi Arabia".into()),
            flag: None,
        }];
        assert_eq!(
            hovered_round_caption(None, &rounds),
            "Hover the chart to inspect a round"
        );
        assert_eq!(
            hovered_round_caption(Some(2), &rounds),
            "Round 2: Saudi Arabian Grand Prix"
        );
        // A round without metadata still gets a caption.
        assert_eq!(hovered_round_caption(Some(5), &rounds), "Round 5: R5");
        assert_eq!(selection_caption(3), "3 drivers selected, click the table header to show all");
    }
}
