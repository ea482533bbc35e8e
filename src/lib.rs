//! Interactive standings and lap-position charts for a racing series dashboard.
//!
//! The library holds the pure visualization core: scales, series synthesis,
//! the hover/selection state machine, pointer resolution and the scene
//! builder. The Yew components in [`components`] only turn scenes into SVG.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

pub mod components;
pub mod config;
pub mod hooks;
pub mod interaction;
pub mod paint;
pub mod pointer;
pub mod scale;
pub mod series;
pub mod sparkline;
pub mod utils;

pub use interaction::{InteractionAction, InteractionState};
pub use series::{build_position_series, build_series, CategoryIndex, EntitySeries};

/// Driver or team identifier as delivered by the API.
pub type EntityId = String;

/// Round number (standings) or lap number (positions). `0` is the synthetic start.
pub type Category = u32;

/// One `(entity, category, value)` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity_id: EntityId,
    pub category: Category,
    pub value: f64,
    pub color: String,
    pub display_name: String,
}

/// Official grid and finishing ranks for one entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryOverride {
    pub entity_id: EntityId,
    pub starting_rank: Option<f64>,
    pub finishing_rank: Option<f64>,
}

/// Descriptive data for a category, used for axis flags and hover payloads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub flag: Option<String>,
}

impl CategoryInfo {
    /// Bare info for a category with no meeting metadata (laps).
    pub fn bare(category: Category) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    /// Short axis label, falling back to the category number.
    pub fn label(&self) -> String {
        self.short_name
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| category_label(self.category))
    }
}

fn category_label(category: Category) -> String {
    format!("R{}", category)
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color {0:?}, expected a hex color like #3671C6")]
    InvalidColor(String),
}

/// Row of the cumulative driver standings feed.
///
/// The feed also carries `team_id`/`team_name`; those are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsRecord {
    pub round_number: Category,
    #[serde(alias = "driver_id")]
    pub entity_id: EntityId,
    pub cumulative_points: f64,
    pub meeting_name: Option<String>,
    pub meeting_short_name: Option<String>,
    pub emoji_flag: Option<String>,
    pub name_acronym: Option<String>,
    #[serde(alias = "driver_name")]
    pub display_name: Option<String>,
    pub color_hex: Option<String>,
}

/// Row of the cumulative constructor standings feed.
///
/// Teams are the entities here: `team_id` identifies the line and
/// `display_name` (or `team_name`) labels it.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstructorStandingsRecord {
    pub round_number: Category,
    pub team_id: EntityId,
    pub cumulative_points: f64,
    pub meeting_name: Option<String>,
    pub meeting_short_name: Option<String>,
    pub emoji_flag: Option<String>,
    pub team_name: Option<String>,
    pub display_name: Option<String>,
    pub color_hex: Option<String>,
}

/// Row of the lap-by-lap position feed.
#[derive(Debug, Clone, Deserialize)]
pub struct LapPositionRecord {
    #[serde(alias = "driver_id")]
    pub entity_id: EntityId,
    pub lap_number: Category,
    pub position: f64,
    pub name_acronym: Option<String>,
    pub color_hex: Option<String>,
}

/// Row of a session classification.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRecord {
    #[serde(alias = "driver_id")]
    pub entity_id: EntityId,
    pub grid_position: Option<f64>,
    pub finish_position: Option<f64>,
}

/// Observations plus per-round meeting metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandingsData {
    pub observations: Vec<Observation>,
    pub rounds: Vec<CategoryInfo>,
}

/// Lap observations plus the classification overrides for the same session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionData {
    pub observations: Vec<Observation>,
    pub overrides: Vec<BoundaryOverride>,
}

fn pick_name(acronym: &Option<String>, name: &Option<String>, id: &str) -> String {
    acronym
        .as_deref()
        .or(name.as_deref())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(id)
        .to_string()
}

impl From<&StandingsRecord> for Observation {
    fn from(record: &StandingsRecord) -> Self {
        Observation {
            entity_id: record.entity_id.clone(),
            category: record.round_number,
            value: record.cumulative_points,
            color: utils::color_or_fallback(record.color_hex.as_deref()),
            display_name: pick_name(&record.name_acronym, &record.display_name, &record.entity_id),
        }
    }
}

impl From<&ConstructorStandingsRecord> for Observation {
    fn from(record: &ConstructorStandingsRecord) -> Self {
        Observation {
            entity_id: record.team_id.clone(),
            category: record.round_number,
            value: record.cumulative_points,
            color: utils::color_or_fallback(record.color_hex.as_deref()),
            display_name: pick_name(&record.display_name, &record.team_name, &record.team_id),
        }
    }
}

impl From<&LapPositionRecord> for Observation {
    fn from(record: &LapPositionRecord) -> Self {
        Observation {
            entity_id: record.entity_id.clone(),
            category: record.lap_number,
            value: record.position,
            color: utils::color_or_fallback(record.color_hex.as_deref()),
            display_name: pick_name(&record.name_acronym, &None, &record.entity_id),
        }
    }
}

impl From<&ClassificationRecord> for BoundaryOverride {
    fn from(record: &ClassificationRecord) -> Self {
        BoundaryOverride {
            entity_id: record.entity_id.clone(),
            starting_rank: record.grid_position,
            finishing_rank: record.finish_position,
        }
    }
}

/// Sorted, de-duplicated round list; the first row seen for a round wins.
fn collect_rounds<I>(rows: I) -> Vec<CategoryInfo>
where
    I: IntoIterator<Item = CategoryInfo>,
{
    let mut rounds: BTreeMap<Category, CategoryInfo> = BTreeMap::new();
    for info in rows {
        rounds.entry(info.category).or_insert(info);
    }
    rounds.into_values().collect()
}

fn round_info(
    round: Category,
    name: &Option<String>,
    short_name: &Option<String>,
    flag: &Option<String>,
) -> CategoryInfo {
    CategoryInfo {
        category: round,
        name: name.clone(),
        short_name: short_name.clone(),
        flag: flag.clone(),
    }
}

/// Split standings rows into observations and a sorted, de-duplicated round list.
pub fn standings_from_records(records: &[StandingsRecord]) -> StandingsData {
    StandingsData {
        observations: records.iter().map(Observation::from).collect(),
        rounds: collect_rounds(records.iter().map(|r| {
            round_info(r.round_number, &r.meeting_name, &r.meeting_short_name, &r.emoji_flag)
        })),
    }
}

/// Same as [`standings_from_records`] for the constructor feed.
pub fn constructor_standings_from_records(records: &[ConstructorStandingsRecord]) -> StandingsData {
    StandingsData {
        observations: records.iter().map(Observation::from).collect(),
        rounds: collect_rounds(records.iter().map(|r| {
            round_info(r.round_number, &r.meeting_name, &r.meeting_short_name, &r.emoji_flag)
        })),
    }
}

pub fn positions_from_records(
    laps: &[LapPositionRecord],
    classification: &[ClassificationRecord],
) -> PositionData {
    PositionData {
        observations: laps.iter().map(Observation::from).collect(),
        overrides: classification.iter().map(BoundaryOverride::from).collect(),
    }
}

fn read_csv<T: for<'de> Deserialize<'de>>(data: &str) -> Result<Vec<T>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Parse a standings CSV export with a header row.
pub fn read_standings_csv(data: &str) -> Result<StandingsData, DataError> {
    let records: Vec<StandingsRecord> = read_csv(data)?;
    info!("Loaded {} standings rows", records.len());
    Ok(standings_from_records(&records))
}

/// Parse a standings JSON array as returned by the standings endpoint.
pub fn read_standings_json(data: &str) -> Result<StandingsData, DataError> {
    let records: Vec<StandingsRecord> = serde_json::from_str(data)?;
    info!("Loaded {} standings rows", records.len());
    Ok(standings_from_records(&records))
}

pub fn read_positions_csv(laps: &str, classification: &str) -> Result<PositionData, DataError> {
    let lap_rows: Vec<LapPositionRecord> = read_csv(laps)?;
    let class_rows: Vec<ClassificationRecord> = read_csv(classification)?;
    info!(
        "Loaded {} lap positions and {} classification rows",
        lap_rows.len(),
        class_rows.len()
    );
    Ok(positions_from_records(&lap_rows, &class_rows))
}

pub fn read_positions_json(laps: &str, classification: &str) -> Result<PositionData, DataError> {
    let lap_rows: Vec<LapPositionRecord> = serde_json::from_str(laps)?;
    let class_rows: Vec<ClassificationRecord> = serde_json::from_str(classification)?;
    info!(
        "Loaded {} lap positions and {} classification rows",
        lap_rows.len(),
        class_rows.len()
    );
    Ok(positions_from_records(&lap_rows, &class_rows))
}

pub fn read_constructor_standings_csv(data: &str) -> Result<StandingsData, DataError> {
    let records: Vec<ConstructorStandingsRecord> = read_csv(data)?;
    info!("Loaded {} constructor standings rows", records.len());
    Ok(constructor_standings_from_records(&records))
}

/// Parse a constructor standings JSON array.
pub fn read_constructor_standings_json(data: &str) -> Result<StandingsData, DataError> {
    let records: Vec<ConstructorStandingsRecord> = serde_json::from_str(data)?;
    info!("Loaded {} constructor standings rows", records.len());
    Ok(constructor_standings_from_records(&records))
}

/// JS entry point: standings rows in, synthesized series out.
///
/// Errors are returned as a string value, the same way the host page
/// receives every other failure from the wasm module.
#[wasm_bindgen]
pub fn standings_series(records_js: JsValue) -> JsValue {
    let records: Vec<StandingsRecord> = match serde_wasm_bindgen::from_value(records_js) {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected standings records: {}", e);
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize standings: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };

    let data = standings_from_records(&records);
    let series = build_series(&data.observations);
    serde_wasm_bindgen::to_value(&series).unwrap_or(JsValue::NULL)
}

/// JS entry point: constructor standings rows in, synthesized series out.
#[wasm_bindgen]
pub fn constructor_standings_series(records_js: JsValue) -> JsValue {
    let records: Vec<ConstructorStandingsRecord> = match serde_wasm_bindgen::from_value(records_js) {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected constructor standings records: {}", e);
            return serde_wasm_bindgen::to_value(&format!(
                "Failed to deserialize constructor standings: {}",
                e
            ))
            .unwrap_or(JsValue::NULL);
        }
    };

    let data = constructor_standings_from_records(&records);
    let series = build_series(&data.observations);
    serde_wasm_bindgen::to_value(&series).unwrap_or(JsValue::NULL)
}

/// JS entry point: lap positions and classification in, position series out.
#[wasm_bindgen]
pub fn position_series(laps_js: JsValue, classification_js: JsValue) -> JsValue {
    let laps: Vec<LapPositionRecord> = match serde_wasm_bindgen::from_value(laps_js) {
        Ok(l) => l,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize laps: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };
    // A missing classification only loses the boundary overrides.
    let classification: Vec<ClassificationRecord> =
        serde_wasm_bindgen::from_value(classification_js).unwrap_or_else(|e| {
            warn!("Ignoring classification: {}", e);
            Vec::new()
        });

    let data = positions_from_records(&laps, &classification);
    let series = build_position_series(&data.observations, &data.overrides);
    serde_wasm_bindgen::to_value(&series).unwrap_or(JsValue::NULL)
}
