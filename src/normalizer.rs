//! Results normalization
//!
//! Turns one feed document into one [`RaceResultSet`]. Every display field of
//! a record is a pure function of that record's own feed fields:
//!
//! | field            | rule                                                        |
//! |------------------|-------------------------------------------------------------|
//! | driver key       | `given + " " + family`, each part trimmed, missing → `N/A`  |
//! | grid position    | `"0"` → `PIT`, empty/absent → `N/A`, otherwise verbatim     |
//! | fastest lap time | verbatim, empty/absent → `N/A`                              |
//! | fastest lap rank | `FastestLap@rank`, absent → `N/A`                           |
//! | display time     | DSQ suffix, lapped status verbatim, DNF suffix, or the time |
//!
//! Records are grouped by driver key in document order. A repeated driver
//! either keeps the first record ([`DuplicatePolicy::FirstWins`]) or fails the
//! whole document ([`DuplicatePolicy::Reject`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::feed::{RaceDocument, RawResult, non_empty};
use crate::types::{
    DISQUALIFIED, DriverResults, NOT_AVAILABLE, PIT_LANE_START, RaceMetadata, RaceResultSet,
    ResultRecord, Round, Season,
};
use crate::{RaceboardError, Result};

/// Status text of a driver who took the chequered flag on the lead lap.
pub const FINISHED_STATUS: &str = "Finished";

/// Feed grid value for a pit lane start.
const PIT_LANE_GRID: &str = "0";

/// How to treat a driver key that appears more than once in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep every record, the first one stays authoritative
    #[default]
    FirstWins,
    /// Fail normalization with [`RaceboardError::DuplicateDriver`]
    Reject,
}

/// Converts feed documents into normalized result sets
#[derive(Debug, Clone, Default)]
pub struct ResultsNormalizer {
    duplicates: DuplicatePolicy,
}

impl ResultsNormalizer {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self { duplicates }
    }

    /// Parse and normalize a feed response body.
    pub fn normalize(&self, xml: &str) -> Result<RaceResultSet> {
        let document = RaceDocument::parse(xml)?;
        self.normalize_document(&document)
    }

    /// Normalize an already parsed document.
    ///
    /// Only the first race of the document is considered. A document without
    /// result blocks fails with [`RaceboardError::EmptyResultSet`].
    pub fn normalize_document(&self, document: &RaceDocument) -> Result<RaceResultSet> {
        let race = document.first_race();
        let results = race
            .and_then(|race| race.results_list.as_ref())
            .map(|list| list.results.as_slice())
            .unwrap_or_default();

        if results.is_empty() {
            let table = &document.race_table;
            let season: Season = non_empty(table.season.as_deref())
                .and_then(|season| season.parse().ok())
                .unwrap_or_default();
            let round: Round = non_empty(table.round.as_deref())
                .and_then(|round| round.parse().ok())
                .unwrap_or_default();
            return Err(RaceboardError::empty_result_set(season, round));
        }

        let metadata = race.map(race_metadata).unwrap_or_default();

        let mut drivers: Vec<DriverResults> = Vec::with_capacity(results.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(results.len());

        for raw in results {
            let record = normalize_record(raw);
            match index.get(&record.driver_key) {
                Some(&slot) => match self.duplicates {
                    DuplicatePolicy::FirstWins => {
                        warn!(
                            driver = %record.driver_key,
                            "Driver listed more than once, keeping first record"
                        );
                        drivers[slot].push_duplicate(record);
                    }
                    DuplicatePolicy::Reject => {
                        return Err(RaceboardError::DuplicateDriver {
                            driver_key: record.driver_key,
                        });
                    }
                },
                None => {
                    index.insert(record.driver_key.clone(), drivers.len());
                    drivers.push(DriverResults::new(record));
                }
            }
        }

        debug!(
            race = %metadata.race_name,
            blocks = results.len(),
            drivers = drivers.len(),
            "Normalized race results"
        );

        Ok(RaceResultSet::new(metadata, drivers))
    }
}

fn race_metadata(race: &crate::feed::Race) -> RaceMetadata {
    let circuit = race.circuit.as_ref();
    let location = circuit.and_then(|c| c.location.as_ref());
    let locality = text_or_na(location.and_then(|l| l.locality.as_deref()));
    let country = text_or_na(location.and_then(|l| l.country.as_deref()));

    RaceMetadata {
        race_name: text_or_na(race.race_name.as_deref()).to_string(),
        circuit_name: text_or_na(circuit.and_then(|c| c.circuit_name.as_deref())).to_string(),
        location_label: format!("{}, {}", locality, country),
        season: non_empty(race.season.as_deref()).map(str::to_string),
        round: non_empty(race.round.as_deref()).map(str::to_string),
        date: non_empty(race.date.as_deref()).map(str::to_string),
    }
}

/// Derive every display field of one result block.
pub fn normalize_record(raw: &RawResult) -> ResultRecord {
    let driver = raw.driver.as_ref();
    let finish_position = finish_position(raw.position.as_deref(), raw.position_text.as_deref());
    let status = text_or_na(raw.status.as_ref().map(|s| s.text.as_str()));
    let raw_time = text_or_na(raw.time.as_ref().map(|t| t.text.as_str()));
    let fastest_lap = raw.fastest_lap.as_ref();

    ResultRecord {
        driver_key: driver_key(
            driver.and_then(|d| d.given_name.as_deref()),
            driver.and_then(|d| d.family_name.as_deref()),
        ),
        display_time: display_time(&finish_position, status, raw_time),
        finish_position,
        grid_position: grid_position(raw.grid.as_deref()),
        constructor_name: text_or_na(raw.constructor.as_ref().and_then(|c| c.name.as_deref()))
            .to_string(),
        fastest_lap_time: fastest_lap_time(
            fastest_lap.and_then(|f| f.time.as_ref()).map(|t| t.text.as_str()),
        ),
        fastest_lap_rank: fastest_lap_rank(fastest_lap.and_then(|f| f.rank.as_deref())),
    }
}

/// `"Given Family"`, with `N/A` standing in for a missing part.
pub fn driver_key(given_name: Option<&str>, family_name: Option<&str>) -> String {
    format!("{} {}", text_or_na(given_name), text_or_na(family_name))
}

/// The classification, or `"D"` when the feed marks the entry disqualified.
pub fn finish_position(position: Option<&str>, position_text: Option<&str>) -> String {
    if non_empty(position_text) == Some(DISQUALIFIED) || non_empty(position) == Some(DISQUALIFIED)
    {
        return DISQUALIFIED.to_string();
    }
    text_or_na(position).to_string()
}

/// Map the feed's grid value; `"0"` is the pit lane sentinel, not a slot.
pub fn grid_position(raw_grid: Option<&str>) -> String {
    match non_empty(raw_grid) {
        Some(PIT_LANE_GRID) => PIT_LANE_START.to_string(),
        Some(grid) => grid.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn fastest_lap_time(raw_time: Option<&str>) -> String {
    text_or_na(raw_time).to_string()
}

pub fn fastest_lap_rank(raw_rank: Option<&str>) -> String {
    text_or_na(raw_rank).to_string()
}

/// Reconcile status and elapsed time into the value shown in the time column.
///
/// Priority: disqualification, then any non-finished status (lapped statuses
/// such as `+1 Lap` are shown as-is, everything else gets a DNF suffix), then
/// the elapsed time.
pub fn display_time(finish_position: &str, status: &str, raw_time: &str) -> String {
    if finish_position == DISQUALIFIED {
        format!("{} (DSQ)", raw_time)
    } else if status != FINISHED_STATUS {
        if status.contains('+') { status.to_string() } else { format!("{} (DNF)", status) }
    } else {
        raw_time.to_string()
    }
}

fn text_or_na(value: Option<&str>) -> &str {
    non_empty(value).unwrap_or(NOT_AVAILABLE)
}
