//! Result set ordering and fastest-lap leader detection
//!
//! [`order`] is a pure function from a canonical [`RaceResultSet`] and a
//! [`SortMode`] to an [`OrderedResults`] view. The canonical set is shared,
//! never modified, so switching back to [`SortMode::Normal`] always restores
//! the official classification exactly.
//!
//! ```rust
//! use raceboard::orderer::{SortMode, order, parse_lap_time};
//! # use raceboard::types::{DriverResults, RaceMetadata, RaceResultSet, ResultRecord};
//! # use std::sync::Arc;
//! # let record = |key: &str, lap: &str, rank: &str| DriverResults::new(ResultRecord {
//! #     driver_key: key.to_string(),
//! #     fastest_lap_time: lap.to_string(),
//! #     fastest_lap_rank: rank.to_string(),
//! #     ..Default::default()
//! # });
//! # let set = Arc::new(RaceResultSet::new(RaceMetadata::default(), vec![
//! #     record("A Driver", "N/A", "N/A"),
//! #     record("B Driver", "1:10.000", "2"),
//! #     record("C Driver", "1:09.500", "1"),
//! # ]));
//!
//! assert_eq!(parse_lap_time("1:23.456"), 83456.0);
//!
//! let sorted = order(&set, SortMode::FastestLap);
//! let laps: Vec<_> = sorted.rows().map(|row| row.record().fastest_lap_time.as_str()).collect();
//! assert_eq!(laps, ["1:09.500", "1:10.000", "N/A"]);
//! assert_eq!(sorted.fastest_lap_leader(), Some("C Driver"));
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::types::{DriverResults, NOT_AVAILABLE, RaceResultSet, ResultRecord};

/// Which order the presentation layer shows the table in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Official classification order
    #[default]
    Normal,
    /// Ascending fastest-lap time, drivers without a lap last
    FastestLap,
}

impl SortMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Normal => SortMode::FastestLap,
            SortMode::FastestLap => SortMode::Normal,
        }
    }
}

/// Lap time in milliseconds, used as a total sort key.
///
/// The input is `minutes:seconds.fraction` (`"1:23.456"`), or plain
/// `seconds.fraction` for sub-minute laps. The result keeps the input's own
/// precision: whole milliseconds for up to three fractional digits.
/// `"N/A"` and anything that does not parse map to `f64::INFINITY`.
pub fn parse_lap_time(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() || text == NOT_AVAILABLE {
        return f64::INFINITY;
    }

    let (minutes, seconds) = match text.split_once(':') {
        Some((minutes, seconds)) => match minutes.trim().parse::<u32>() {
            Ok(minutes) => (minutes, seconds.trim()),
            Err(_) => return unparseable(text),
        },
        None => (0, text),
    };

    let seconds_value = match seconds.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => return unparseable(text),
    };

    let fraction_digits = seconds.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    let millis = (f64::from(minutes) * 60.0 + seconds_value) * 1000.0;
    let scale = 10f64.powi(fraction_digits.saturating_sub(3) as i32);
    (millis * scale).round() / scale
}

fn unparseable(text: &str) -> f64 {
    trace!(lap_time = text, "Unparseable lap time sorts last");
    f64::INFINITY
}

/// Driver holding fastest-lap rank "1", scanning in classification order.
///
/// Should the feed mark several drivers rank "1", the last one scanned wins.
pub fn fastest_lap_leader(results: &RaceResultSet) -> Option<&str> {
    results.iter().fold(None, |leader, entry| {
        if entry.primary().has_fastest_lap() { Some(entry.driver_key()) } else { leader }
    })
}

/// Produce the view of `results` for `mode`.
pub fn order(results: &Arc<RaceResultSet>, mode: SortMode) -> OrderedResults {
    let mut indices: Vec<usize> = (0..results.len()).collect();

    if mode == SortMode::FastestLap {
        let keys: Vec<f64> = results
            .iter()
            .map(|entry| parse_lap_time(&entry.primary().fastest_lap_time))
            .collect();
        // sort_by is stable: equal keys keep classification order
        indices.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    }

    let leader = fastest_lap_leader(results).map(str::to_string);
    debug!(?mode, drivers = indices.len(), leader = ?leader, "Ordered race results");

    OrderedResults { results: Arc::clone(results), mode, indices, leader }
}

/// An ordered, read-only view over a canonical result set
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedResults {
    results: Arc<RaceResultSet>,
    mode: SortMode,
    indices: Vec<usize>,
    leader: Option<String>,
}

impl OrderedResults {
    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// The canonical, unsorted set this view was derived from.
    pub fn canonical(&self) -> &Arc<RaceResultSet> {
        &self.results
    }

    pub fn fastest_lap_leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Rows in view order.
    pub fn rows(&self) -> impl Iterator<Item = OrderedRow<'_>> {
        let drivers = self.results.entries();
        self.indices.iter().map(move |&i| {
            let entry = &drivers[i];
            OrderedRow {
                entry,
                is_fastest_lap_leader: self.leader.as_deref() == Some(entry.driver_key()),
            }
        })
    }

    /// Driver keys in view order.
    pub fn driver_keys(&self) -> Vec<&str> {
        self.rows().map(|row| row.entry.driver_key()).collect()
    }

    /// Materialize the view as a new result set. Records are shared with the
    /// canonical set, not copied.
    pub fn to_result_set(&self) -> RaceResultSet {
        let drivers = self.rows().map(|row| row.entry.clone()).collect();
        RaceResultSet::new(self.results.race.clone(), drivers)
    }

    /// The same canonical set in the other mode.
    pub fn toggled(&self) -> OrderedResults {
        order(&self.results, self.mode.toggled())
    }
}

/// One row of an [`OrderedResults`] view
#[derive(Debug, Clone, Copy)]
pub struct OrderedRow<'a> {
    entry: &'a DriverResults,
    is_fastest_lap_leader: bool,
}

impl<'a> OrderedRow<'a> {
    pub fn driver_key(&self) -> &'a str {
        self.entry.driver_key()
    }

    /// First (authoritative) record for the driver.
    pub fn record(&self) -> &'a Arc<ResultRecord> {
        self.entry.primary()
    }

    pub fn is_fastest_lap_leader(&self) -> bool {
        self.is_fastest_lap_leader
    }
}
