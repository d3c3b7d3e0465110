//! CSV loading for the case distribution and continent lookup sources.
//!
//! Sources are read whole, checked for the columns the pipeline needs, and
//! deserialized into typed rows. Extra columns are ignored.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::error::PipelineError;
use crate::fetch::{HttpClient, fetch_source};
use crate::records::{CaseRecord, ContinentRow};

/// Columns that must be present in the case distribution source.
pub const CASE_COLUMNS: &[&str] = &[
    "dateRep",
    "cases",
    "deaths",
    "countriesAndTerritories",
    "geoId",
    "countryterritoryCode",
    "popData2019",
];

/// Columns that must be present in the continent lookup source.
pub const CONTINENT_COLUMNS: &[&str] = &["Continent_Name", "Three_Letter_Country_Code"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Deserialize)]
struct RawCaseRow {
    #[serde(rename = "dateRep", deserialize_with = "de_report_date")]
    date: NaiveDate,
    #[serde(deserialize_with = "de_count")]
    cases: i64,
    #[serde(deserialize_with = "de_count")]
    deaths: i64,
    #[serde(rename = "countriesAndTerritories")]
    entity: String,
    #[serde(rename = "geoId", deserialize_with = "de_optional_text")]
    geo_id: Option<String>,
    #[serde(rename = "countryterritoryCode", deserialize_with = "de_optional_text")]
    country_code: Option<String>,
    #[serde(rename = "popData2019", deserialize_with = "de_population")]
    population: Option<u64>,
}

impl From<RawCaseRow> for CaseRecord {
    fn from(row: RawCaseRow) -> Self {
        CaseRecord {
            date: row.date,
            entity: row.entity,
            country_code: row.country_code,
            geo_id: row.geo_id,
            population: row.population,
            daily_cases: row.cases,
            daily_deaths: row.deaths,
        }
    }
}

/// Parses CSV `bytes` into rows of `T` after checking that every column in
/// `required` is present in the header.
pub fn read_table<T: DeserializeOwned>(
    bytes: &[u8],
    location: &str,
    required: &[&str],
) -> Result<Vec<T>, PipelineError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::unavailable(location, e))?
        .clone();

    if let Some(missing) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(PipelineError::SchemaMismatch {
            location: location.to_string(),
            column: missing.to_string(),
        });
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: T =
            result.map_err(|e| PipelineError::unavailable(location, format!("row {}: {e}", i + 1)))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parses the case distribution CSV.
pub fn parse_cases(bytes: &[u8], location: &str) -> Result<Vec<CaseRecord>, PipelineError> {
    let rows: Vec<RawCaseRow> = read_table(bytes, location, CASE_COLUMNS)?;
    Ok(rows.into_iter().map(CaseRecord::from).collect())
}

/// Parses the continent lookup CSV.
pub fn parse_continents(bytes: &[u8], location: &str) -> Result<Vec<ContinentRow>, PipelineError> {
    read_table(bytes, location, CONTINENT_COLUMNS)
}

/// Fetches and parses the case distribution source.
#[tracing::instrument(skip(client))]
pub async fn load_cases<C: HttpClient>(
    client: &C,
    location: &str,
) -> Result<Vec<CaseRecord>, PipelineError> {
    let bytes = fetch_source(client, location).await?;
    let records = parse_cases(&bytes, location)?;
    info!(rows = records.len(), "Case records loaded");
    Ok(records)
}

/// Fetches and parses the continent lookup source.
#[tracing::instrument(skip(client))]
pub async fn load_continents<C: HttpClient>(
    client: &C,
    location: &str,
) -> Result<Vec<ContinentRow>, PipelineError> {
    let bytes = fetch_source(client, location).await?;
    let rows = parse_continents(&bytes, location)?;
    info!(rows = rows.len(), "Continent rows loaded");
    Ok(rows)
}

/// Reads a report date. The source is day-first (`DD/MM/YYYY`); ISO dates are
/// accepted too.
fn de_report_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    NaiveDate::parse_from_str(&raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
        .map_err(|_| D::Error::custom(format!("unrecognised date `{raw}`")))
}

/// Empty cells count as zero.
fn de_count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    match de_optional_text(d)? {
        None => Ok(0),
        Some(raw) => parse_number(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid count `{raw}`"))),
    }
}

fn de_population<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match de_optional_text(d)? {
        None => Ok(None),
        Some(raw) => parse_number(&raw)
            .and_then(|n| u64::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid population `{raw}`"))),
    }
}

/// Reads a text cell, mapping empty cells to `None`.
pub(crate) fn de_optional_text<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn parse_number(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
