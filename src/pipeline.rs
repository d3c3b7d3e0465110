//! End-to-end wiring of the stages: load → aggregate → join → frames.

use tracing::{debug, info};

use crate::aggregate::{
    append_aggregate, compute_running_totals, derive_world_aggregate, sort_chronologically,
};
use crate::config::{ColorMap, Sources};
use crate::error::PipelineError;
use crate::fetch::HttpClient;
use crate::frames::{AnimationSequence, build_animation_sequence, distinct_dates_ascending};
use crate::join::{ContinentTable, join_continent};
use crate::loader::{load_cases, load_continents};
use crate::records::{CaseRecord, ContinentRow, EnrichedRecord};

/// Output of a full pipeline run.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub records: Vec<EnrichedRecord>,
    pub sequence: AnimationSequence,
}

/// Final state of one entity, as reported by `list-entities`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub entity: String,
    pub continent: Option<String>,
    pub records: usize,
    pub total_cases: i64,
    pub total_deaths: i64,
}

/// Adds the World aggregate, running totals and continents to raw case records.
pub fn enrich(cases: Vec<CaseRecord>, continents: Vec<ContinentRow>) -> Vec<EnrichedRecord> {
    let cases = sort_chronologically(cases);
    let world = derive_world_aggregate(&cases);
    debug!(world_days = world.len(), "World aggregate derived");

    let combined = append_aggregate(cases, world);
    let totals = compute_running_totals(combined);

    let table = ContinentTable::from_rows(continents);
    debug!(codes = table.len(), "Continent table built");
    join_continent(totals, &table)
}

/// Derives the animation frames from enriched records.
pub fn build_sequence(records: &[EnrichedRecord], colors: &ColorMap) -> AnimationSequence {
    let dates = distinct_dates_ascending(records);
    build_animation_sequence(&dates, records, colors)
}

/// Loads both sources and runs every transformation stage.
#[tracing::instrument(skip(client, colors), fields(cases = %sources.cases, continents = %sources.continents))]
pub async fn run<C: HttpClient>(
    client: &C,
    sources: &Sources,
    colors: &ColorMap,
) -> Result<Dashboard, PipelineError> {
    let cases = load_cases(client, &sources.cases).await?;
    let continents = load_continents(client, &sources.continents).await?;

    let records = enrich(cases, continents);
    let sequence = build_sequence(&records, colors);

    info!(
        records = records.len(),
        frames = sequence.frames.len(),
        "Pipeline complete"
    );

    Ok(Dashboard { records, sequence })
}

/// One summary per entity, in entity order. Expects records grouped by
/// entity and ordered by date, as produced by [`enrich`].
pub fn entity_summaries(records: &[EnrichedRecord]) -> Vec<EntitySummary> {
    let mut out: Vec<EntitySummary> = Vec::new();

    for r in records {
        match out.last_mut() {
            Some(last) if last.entity == r.record.entity => {
                last.records += 1;
                last.total_cases = r.total_cases;
                last.total_deaths = r.total_deaths;
            }
            _ => out.push(EntitySummary {
                entity: r.record.entity.clone(),
                continent: r.continent.clone(),
                records: 1,
                total_cases: r.total_cases,
                total_deaths: r.total_deaths,
            }),
        }
    }

    out
}
