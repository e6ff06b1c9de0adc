//! Race table, race and circuit elements
//!
//! This module contains the race-level elements of the feed document.

use serde::{Deserialize, Serialize};

use super::RawResult;

/// `RaceTable` element: the races matching the request
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RaceTable {
    /// Season the request was scoped to
    #[serde(rename = "@season")]
    pub season: Option<String>,
    /// Round the request was scoped to
    #[serde(rename = "@round")]
    pub round: Option<String>,
    /// Races, in feed order
    #[serde(rename = "Race")]
    pub races: Vec<Race>,
}

/// `Race` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Race {
    #[serde(rename = "@season")]
    pub season: Option<String>,
    #[serde(rename = "@round")]
    pub round: Option<String>,
    /// Grand Prix name
    pub race_name: Option<String>,
    /// Circuit details
    pub circuit: Option<Circuit>,
    /// Race date (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Classification; absent in season listings
    pub results_list: Option<ResultsList>,
}

/// `Circuit` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Circuit {
    #[serde(rename = "@circuitId")]
    pub circuit_id: Option<String>,
    pub circuit_name: Option<String>,
    pub location: Option<Location>,
}

/// `Location` element of a circuit
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Location {
    pub locality: Option<String>,
    pub country: Option<String>,
}

/// `ResultsList` element: one result block per classified entry
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResultsList {
    #[serde(rename = "Result")]
    pub results: Vec<RawResult>,
}
