//! Record types flowing between the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loader::de_optional_text;

/// Entity name of the synthetic all-countries aggregate.
pub const WORLD_ENTITY: &str = "World";
pub const WORLD_GEO_ID: &str = "WD";
pub const WORLD_COUNTRY_CODE: &str = "WLD";

/// One day of reported cases and deaths for one country or territory.
///
/// Daily counts are signed: the source publishes negative corrections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub entity: String,
    /// ISO-3 code, absent for entities such as conveyances.
    pub country_code: Option<String>,
    pub geo_id: Option<String>,
    pub population: Option<u64>,
    pub daily_cases: i64,
    pub daily_deaths: i64,
}

impl CaseRecord {
    /// Builds the synthetic "World" record for `date`.
    pub fn world(date: NaiveDate, daily_cases: i64, daily_deaths: i64, population: u64) -> Self {
        CaseRecord {
            date,
            entity: WORLD_ENTITY.to_string(),
            country_code: Some(WORLD_COUNTRY_CODE.to_string()),
            geo_id: Some(WORLD_GEO_ID.to_string()),
            population: Some(population),
            daily_cases,
            daily_deaths,
        }
    }

    pub fn is_world(&self) -> bool {
        self.entity == WORLD_ENTITY
    }
}

/// A [`CaseRecord`] with its running totals and joined continent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub record: CaseRecord,
    pub continent: Option<String>,
    pub total_cases: i64,
    pub total_deaths: i64,
}

/// One row of the continent lookup table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContinentRow {
    #[serde(rename = "Continent_Name")]
    pub continent: String,
    #[serde(
        rename = "Three_Letter_Country_Code",
        deserialize_with = "de_optional_text"
    )]
    pub country_code: Option<String>,
}
