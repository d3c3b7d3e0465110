//! Left join of enriched records onto the continent lookup table.

use std::collections::HashMap;

use crate::records::{ContinentRow, EnrichedRecord};

/// Country code → continent name, deduplicated so each code maps to at most
/// one continent.
#[derive(Debug, Default, Clone)]
pub struct ContinentTable {
    by_code: HashMap<String, String>,
}

impl ContinentTable {
    /// Builds the table keeping the first row seen for each country code.
    /// Rows without a code are skipped.
    pub fn from_rows(rows: impl IntoIterator<Item = ContinentRow>) -> Self {
        let mut by_code = HashMap::new();
        for row in rows {
            if let Some(code) = row.country_code {
                by_code.entry(code).or_insert(row.continent);
            }
        }
        Self { by_code }
    }

    pub fn continent_for(&self, country_code: &str) -> Option<&str> {
        self.by_code.get(country_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Attaches a continent to every record whose country code is in `table`.
/// Unmatched records keep `continent = None`; the row count never changes.
pub fn join_continent(records: Vec<EnrichedRecord>, table: &ContinentTable) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .map(|mut r| {
            r.continent = r
                .record
                .country_code
                .as_deref()
                .and_then(|code| table.continent_for(code))
                .map(str::to_string);
            r
        })
        .collect()
}
