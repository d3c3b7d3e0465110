//! Animation frame derivation.
//!
//! Each calendar day after 2019 becomes one [`Frame`] holding one
//! [`MarkerLayer`] per continent. Records without a continent (the World
//! aggregate, conveyances, unmatched codes) are never drawn.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ColorMap;
use crate::records::EnrichedRecord;

/// Marker area is `total_cases / SIZE_DIVISOR`.
pub const SIZE_DIVISOR: f64 = 200.0;

/// Frames start on the first day of this year.
pub const FIRST_FRAME_YEAR: i32 = 2020;

const LABEL_FORMAT: &str = "%d %b";

/// A calendar day with its slider label, e.g. `05 Mar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameDate {
    pub date: NaiveDate,
    pub label: String,
}

impl FrameDate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.format(LABEL_FORMAT).to_string(),
        }
    }
}

/// The markers of one continent within one frame. The three vectors are
/// parallel, one entry per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub continent: String,
    pub color: String,
    pub locations: Vec<String>,
    pub sizes: Vec<f64>,
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub date: NaiveDate,
    pub layers: Vec<MarkerLayer>,
}

/// Slider entry pointing at a frame by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub label: String,
    pub frame: String,
}

/// Everything the presenter needs to animate the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationSequence {
    pub frames: Vec<Frame>,
    pub steps: Vec<Step>,
    /// Layers of the most recent date, shown before playback starts.
    pub initial: Vec<MarkerLayer>,
}

fn in_window(date: NaiveDate) -> bool {
    date.year() >= FIRST_FRAME_YEAR
}

/// Distinct dates after 2019, ascending, with their display labels.
///
/// Labels carry no year, so the same day in two different years shares a
/// label.
pub fn distinct_dates_ascending(records: &[EnrichedRecord]) -> Vec<FrameDate> {
    records
        .iter()
        .map(|r| r.record.date)
        .filter(|d| in_window(*d))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(FrameDate::new)
        .collect()
}

/// Builds the marker layer for `continent` from one day's records, keeping
/// their order.
pub fn build_layer(records: &[&EnrichedRecord], continent: &str, color: &str) -> MarkerLayer {
    let mut layer = MarkerLayer {
        continent: continent.to_string(),
        color: color.to_string(),
        locations: Vec::new(),
        sizes: Vec::new(),
        text: Vec::new(),
    };

    for r in records
        .iter()
        .filter(|r| r.continent.as_deref() == Some(continent))
    {
        let Some(code) = r.record.country_code.as_deref() else {
            continue;
        };
        layer.locations.push(code.to_string());
        layer.sizes.push(marker_size(r.total_cases));
        layer
            .text
            .push(format!("{}: Total Cases: {}", r.record.entity, r.total_cases));
    }

    layer
}

pub fn marker_size(total_cases: i64) -> f64 {
    total_cases as f64 / SIZE_DIVISOR
}

/// Builds the frame for `date` out of the full record set.
pub fn build_frame(date: &FrameDate, records: &[EnrichedRecord], colors: &ColorMap) -> Frame {
    let day: Vec<&EnrichedRecord> = records
        .iter()
        .filter(|r| r.record.date == date.date)
        .collect();
    frame_for_day(date, &day, colors)
}

/// One layer per continent present on the day, in alphabetical order.
fn frame_for_day(date: &FrameDate, day: &[&EnrichedRecord], colors: &ColorMap) -> Frame {
    let continents: BTreeSet<&str> = day.iter().filter_map(|r| r.continent.as_deref()).collect();

    let layers = continents
        .into_iter()
        .map(|continent| build_layer(day, continent, colors.color_for(continent)))
        .collect();

    Frame {
        name: date.label.clone(),
        date: date.date,
        layers,
    }
}

/// Builds one frame and one slider step per date, plus the initial layers
/// taken from the last date.
pub fn build_animation_sequence(
    dates: &[FrameDate],
    records: &[EnrichedRecord],
    colors: &ColorMap,
) -> AnimationSequence {
    let mut by_date: BTreeMap<NaiveDate, Vec<&EnrichedRecord>> = BTreeMap::new();
    for r in records {
        by_date.entry(r.record.date).or_default().push(r);
    }

    let mut frames = Vec::with_capacity(dates.len());
    let mut steps = Vec::with_capacity(dates.len());

    for date in dates {
        let day = by_date.get(&date.date).map(Vec::as_slice).unwrap_or_default();
        let frame = frame_for_day(date, day, colors);
        steps.push(Step {
            label: date.label.clone(),
            frame: frame.name.clone(),
        });
        frames.push(frame);
    }

    let initial = frames
        .last()
        .map(|f| f.layers.clone())
        .unwrap_or_default();

    AnimationSequence {
        frames,
        steps,
        initial,
    }
}
