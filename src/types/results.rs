//! Normalized race result model

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder used for every expected field the feed leaves out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Finish-position literal marking a disqualified driver.
pub const DISQUALIFIED: &str = "D";

/// Grid-position literal for a pit lane start.
pub const PIT_LANE_START: &str = "PIT";

/// Race-level metadata shown above the results table
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RaceMetadata {
    /// Grand Prix name
    pub race_name: String,
    /// Circuit name
    pub circuit_name: String,
    /// "Locality, Country"
    pub location_label: String,
    /// Season year, when the feed states it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    /// Round number, when the feed states it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    /// Race date, when the feed states it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One driver's classification in one race, with all display fields derived
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// "GivenName FamilyName"
    pub driver_key: String,
    /// Numeric position, or `"D"` when disqualified
    pub finish_position: String,
    /// Numeric grid slot, `"PIT"` or `"N/A"`
    pub grid_position: String,
    pub constructor_name: String,
    /// Elapsed time or status text, already reconciled for DNF/DSQ
    pub display_time: String,
    /// `m:ss.fff`, or `"N/A"`
    pub fastest_lap_time: String,
    /// Rank among the race's fastest laps, or `"N/A"`
    pub fastest_lap_rank: String,
}

impl ResultRecord {
    pub fn is_disqualified(&self) -> bool {
        self.finish_position == DISQUALIFIED
    }

    pub fn started_from_pit_lane(&self) -> bool {
        self.grid_position == PIT_LANE_START
    }

    /// Holds rank "1" among the race's fastest laps.
    pub fn has_fastest_lap(&self) -> bool {
        self.fastest_lap_rank == "1"
    }
}

/// All records the feed listed for one driver, in document order.
///
/// The first record is authoritative; later ones are kept but never read by
/// the orderer or the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct DriverResults {
    driver_key: String,
    record: Arc<ResultRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    duplicates: Vec<Arc<ResultRecord>>,
}

impl DriverResults {
    /// Start a driver's entry with their first record.
    pub fn new(record: ResultRecord) -> Self {
        Self {
            driver_key: record.driver_key.clone(),
            record: Arc::new(record),
            duplicates: Vec::new(),
        }
    }

    /// Append a further record for the same driver without touching the first.
    pub fn push_duplicate(&mut self, record: ResultRecord) {
        self.duplicates.push(Arc::new(record));
    }

    pub fn driver_key(&self) -> &str {
        &self.driver_key
    }

    /// The record every consumer reads.
    pub fn primary(&self) -> &Arc<ResultRecord> {
        &self.record
    }

    /// Every record for this driver, primary first.
    pub fn records(&self) -> impl Iterator<Item = &Arc<ResultRecord>> {
        std::iter::once(&self.record).chain(self.duplicates.iter())
    }

    /// Number of records the feed listed for this driver.
    pub fn record_count(&self) -> usize {
        1 + self.duplicates.len()
    }
}

/// Normalized results for one race.
///
/// Driver entries iterate in official classification order, as delivered by
/// the feed. The set is never reordered in place; see [`crate::orderer`].
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RaceResultSet {
    pub race: RaceMetadata,
    drivers: Vec<DriverResults>,
}

impl RaceResultSet {
    pub fn new(race: RaceMetadata, drivers: Vec<DriverResults>) -> Self {
        Self { race, drivers }
    }

    /// Number of distinct drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Driver entries in classification order.
    pub fn entries(&self) -> &[DriverResults] {
        &self.drivers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DriverResults> {
        self.drivers.iter()
    }

    pub fn get(&self, driver_key: &str) -> Option<&DriverResults> {
        self.drivers.iter().find(|entry| entry.driver_key == driver_key)
    }

    pub fn driver_keys(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(|entry| entry.driver_key.as_str())
    }
}

impl<'a> IntoIterator for &'a RaceResultSet {
    type Item = &'a DriverResults;
    type IntoIter = std::slice::Iter<'a, DriverResults>;

    fn into_iter(self) -> Self::IntoIter {
        self.drivers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(driver_key: &str, position: &str) -> ResultRecord {
        ResultRecord {
            driver_key: driver_key.to_string(),
            finish_position: position.to_string(),
            grid_position: "1".to_string(),
            constructor_name: "Ferrari".to_string(),
            display_time: "1:30:00.000".to_string(),
            fastest_lap_time: "1:20.000".to_string(),
            fastest_lap_rank: "2".to_string(),
        }
    }

    #[test]
    fn duplicates_never_replace_the_primary_record() {
        let mut entry = DriverResults::new(record("Charles Leclerc", "1"));
        entry.push_duplicate(record("Charles Leclerc", "9"));

        assert_eq!(entry.record_count(), 2);
        assert_eq!(entry.records().nth(1).unwrap().finish_position, "9");
        assert_eq!(entry.primary().finish_position, "1");
    }

    #[test]
    fn lookup_by_driver_key() {
        let set = RaceResultSet::new(
            RaceMetadata::default(),
            vec![
                DriverResults::new(record("Charles Leclerc", "1")),
                DriverResults::new(record("Carlos Sainz", "2")),
            ],
        );

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("Carlos Sainz").unwrap().primary().finish_position, "2");
        assert!(set.get("Lando Norris").is_none());
        assert_eq!(set.driver_keys().collect::<Vec<_>>(), ["Charles Leclerc", "Carlos Sainz"]);
    }

    #[test]
    fn record_flags_follow_sentinels() {
        let mut dsq = record("Pierre Gasly", DISQUALIFIED);
        dsq.grid_position = PIT_LANE_START.to_string();
        dsq.fastest_lap_rank = "1".to_string();

        assert!(dsq.is_disqualified());
        assert!(dsq.started_from_pit_lane());
        assert!(dsq.has_fastest_lap());
        assert!(!record("Esteban Ocon", "3").has_fastest_lap());
    }
}
