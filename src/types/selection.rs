//! Season and round selectors for feed requests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{RaceboardError, Result};

/// Season selector for a results request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub enum Season {
    /// The season currently in progress
    #[default]
    Current,

    /// A specific championship year
    Year(u16),
}

/// Round selector within a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
pub enum Round {
    /// The most recent round that has results
    #[default]
    Last,

    /// A specific round number (1-based)
    Number(u32),
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Current => f.write_str("current"),
            Season::Year(year) => write!(f, "{}", year),
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Last => f.write_str("last"),
            Round::Number(round) => write!(f, "{}", round),
        }
    }
}

impl FromStr for Season {
    type Err = RaceboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("current") {
            return Ok(Season::Current);
        }
        s.parse::<u16>()
            .map(Season::Year)
            .map_err(|_| RaceboardError::config(format!("invalid season '{}'", s)))
    }
}

impl FromStr for Round {
    type Err = RaceboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("last") {
            return Ok(Round::Last);
        }
        match s.parse::<u32>() {
            Ok(0) | Err(_) => Err(RaceboardError::config(format!("invalid round '{}'", s))),
            Ok(round) => Ok(Round::Number(round)),
        }
    }
}

/// One entry of a season's race listing, used by the season/round picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RaceListing {
    /// Round number within the season
    pub round: u32,
    /// Grand Prix name
    pub race_name: String,
    /// Race date as published by the feed (`YYYY-MM-DD`)
    pub date: String,
}
