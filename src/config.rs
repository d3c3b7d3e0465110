//! Runtime configuration: source locations and the continent color palette.

use anyhow::{Context, Result};
use std::collections::HashMap;

/// ECDC case distribution by country and day.
pub const DEFAULT_CASES_URL: &str = "https://opendata.ecdc.europa.eu/covid19/casedistribution/csv";

/// Continent lookup keyed by ISO-3 country code.
pub const DEFAULT_CONTINENTS_URL: &str =
    "https://raw.githubusercontent.com/LUNDR/covid-19/master/app/assets/continents.csv";

/// Locations (URL or local path) of the two input tables.
#[derive(Debug, Clone)]
pub struct Sources {
    pub cases: String,
    pub continents: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            cases: DEFAULT_CASES_URL.to_string(),
            continents: DEFAULT_CONTINENTS_URL.to_string(),
        }
    }
}

const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("Asia", "royalblue"),
    ("Europe", "crimson"),
    ("Africa", "lightseagreen"),
    ("Oceania", "orange"),
    ("North America", "gold"),
    ("South America", "mediumslateblue"),
];

const DEFAULT_FALLBACK: &str = "peru";

/// Maps continent names to marker colors.
///
/// Can be overridden from a JSON object on disk:
/// ```json
/// {
///   "Asia": "royalblue",
///   "Europe": "#dc143c"
/// }
/// ```
/// Continents absent from the map are drawn in the fallback color.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: HashMap<String, String>,
    fallback: String,
}

impl ColorMap {
    pub fn new(entries: HashMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            entries,
            fallback: fallback.into(),
        }
    }

    /// Loads the palette from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read color map '{path}'"))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("color map '{path}' is not a JSON object of strings"))?;
        Ok(Self::new(entries, DEFAULT_FALLBACK))
    }

    /// Returns the color for `continent`, or the fallback.
    pub fn color_for(&self, continent: &str) -> &str {
        self.entries
            .get(continent)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        let entries = DEFAULT_PALETTE
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(entries, DEFAULT_FALLBACK)
    }
}
