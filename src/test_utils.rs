//! Test utilities for fixture access and synthetic feed documents
//!
//! This module provides helpers shared by unit tests, integration tests and
//! benchmarks: locating the XML fixtures under `tests/fixtures/` and building
//! small feed documents or result sets without touching the network.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use crate::types::{DriverResults, RaceMetadata, RaceResultSet, ResultRecord};

/// Error returned when a required feed fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl FixtureError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Directory holding the recorded feed documents.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Require that a specific fixture exists on disk.
pub fn require_fixture(name: &str) -> Result<PathBuf, FixtureError> {
    let path = fixture_dir().join(name);
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError::new(format!("Missing feed fixture: {}", path.display())))
    }
}

/// One `Result` block in feed format.
///
/// Finishers get an elapsed time; everyone gets grid slot = position and a
/// fastest lap ranked by position.
pub fn sample_result_xml(position: &str, given: &str, family: &str, status: &str) -> String {
    let time = if status == "Finished" {
        r#"<Time millis="5222624">1:27:02.624</Time>"#
    } else {
        ""
    };
    format!(
        r#"<Result number="{position}" position="{position}" positionText="{position}" points="0">
  <Driver driverId="{id}"><GivenName>{given}</GivenName><FamilyName>{family}</FamilyName></Driver>
  <Constructor constructorId="team"><Name>Team {family}</Name></Constructor>
  <Grid>{position}</Grid>
  <Laps>58</Laps>
  <Status statusId="1">{status}</Status>
  {time}
  <FastestLap rank="{position}" lap="40"><Time>1:26.993</Time></FastestLap>
</Result>"#,
        id = family.to_lowercase(),
    )
}

/// Wrap result blocks into a complete single-race results document.
pub fn wrap_results(blocks: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<MRData xmlns="http://ergast.com/mrd/1.5" series="f1" limit="30" offset="0" total="{total}">
<RaceTable season="2023" round="22">
<Race season="2023" round="22">
<RaceName>Abu Dhabi Grand Prix</RaceName>
<Circuit circuitId="yas_marina">
<CircuitName>Yas Marina Circuit</CircuitName>
<Location lat="24.4672" long="54.6031">
<Locality>Abu Dhabi</Locality>
<Country>UAE</Country>
</Location>
</Circuit>
<Date>2023-11-26</Date>
<ResultsList>
{blocks}
</ResultsList>
</Race>
</RaceTable>
</MRData>"#,
        total = blocks.len(),
        blocks = blocks.join("\n"),
    )
}

/// Build a result set directly from `(driver_key, fastest_lap_time, fastest_lap_rank)`
/// rows, in classification order.
pub fn result_set(rows: &[(&str, &str, &str)]) -> RaceResultSet {
    let drivers = rows
        .iter()
        .enumerate()
        .map(|(i, (driver_key, lap_time, rank))| {
            DriverResults::new(ResultRecord {
                driver_key: driver_key.to_string(),
                finish_position: (i + 1).to_string(),
                grid_position: (i + 1).to_string(),
                constructor_name: "Team".to_string(),
                display_time: "1:30:00.000".to_string(),
                fastest_lap_time: lap_time.to_string(),
                fastest_lap_rank: rank.to_string(),
            })
        })
        .collect();

    RaceResultSet::new(
        RaceMetadata {
            race_name: "Test Grand Prix".to_string(),
            circuit_name: "Test Circuit".to_string(),
            location_label: "Testville, Testland".to_string(),
            ..Default::default()
        },
        drivers,
    )
}
