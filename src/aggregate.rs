//! Per-date world aggregation and per-entity running totals.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::records::{CaseRecord, EnrichedRecord};

#[derive(Default)]
struct DaySums {
    cases: i64,
    deaths: i64,
    population: u64,
}

/// Sorts records by entity, then date. This is the order the case source is
/// normalised to right after loading.
pub fn sort_chronologically(mut records: Vec<CaseRecord>) -> Vec<CaseRecord> {
    records.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.date.cmp(&b.date)));
    records
}

/// Sums daily cases, deaths and population over every non-World record for
/// each date, yielding one "World" record per distinct date in ascending order.
pub fn derive_world_aggregate(records: &[CaseRecord]) -> Vec<CaseRecord> {
    let mut by_date: BTreeMap<NaiveDate, DaySums> = BTreeMap::new();

    for record in records.iter().filter(|r| !r.is_world()) {
        let sums = by_date.entry(record.date).or_default();
        sums.cases += record.daily_cases;
        sums.deaths += record.daily_deaths;
        sums.population += record.population.unwrap_or(0);
    }

    by_date
        .into_iter()
        .map(|(date, s)| CaseRecord::world(date, s.cases, s.deaths, s.population))
        .collect()
}

/// Returns `records` followed by `aggregate`.
pub fn append_aggregate(mut records: Vec<CaseRecord>, aggregate: Vec<CaseRecord>) -> Vec<CaseRecord> {
    records.extend(aggregate);
    records
}

/// Computes cumulative cases and deaths per entity.
///
/// Records come back ordered by entity, then date. Totals reset at each entity
/// boundary; missing dates are not filled in.
pub fn compute_running_totals(records: Vec<CaseRecord>) -> Vec<EnrichedRecord> {
    let records = sort_chronologically(records);

    let mut out = Vec::with_capacity(records.len());
    let mut current: Option<String> = None;
    let mut total_cases = 0i64;
    let mut total_deaths = 0i64;

    for record in records {
        if current.as_deref() != Some(record.entity.as_str()) {
            current = Some(record.entity.clone());
            total_cases = 0;
            total_deaths = 0;
        }

        total_cases += record.daily_cases;
        total_deaths += record.daily_deaths;

        out.push(EnrichedRecord {
            record,
            continent: None,
            total_cases,
            total_deaths,
        });
    }

    out
}
