//! Per-driver result blocks
//!
//! One [`RawResult`] per `Result` element, exactly as the feed delivers it.

use serde::{Deserialize, Serialize};

/// Text content of an element that also carries attributes
/// (e.g. `<Status statusId="11">+1 Lap</Status>`)
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextNode {
    #[serde(rename = "$text")]
    pub text: String,
}

/// `Result` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RawResult {
    /// Car number
    #[serde(rename = "@number")]
    pub number: Option<String>,
    /// Numeric classification
    #[serde(rename = "@position")]
    pub position: Option<String>,
    /// Classification text ("1".."N", "R" retired, "D" disqualified, ...)
    #[serde(rename = "@positionText")]
    pub position_text: Option<String>,
    /// Championship points scored
    #[serde(rename = "@points")]
    pub points: Option<String>,
    pub driver: Option<DriverNode>,
    pub constructor: Option<ConstructorNode>,
    /// Starting grid slot; "0" means a pit lane start
    pub grid: Option<String>,
    /// Laps completed
    pub laps: Option<String>,
    /// "Finished", "+1 Lap", "Engine", ...
    pub status: Option<TextNode>,
    /// Elapsed race time (winner) or gap (others); absent for non-finishers
    pub time: Option<TextNode>,
    pub fastest_lap: Option<FastestLapNode>,
}

/// `Driver` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct DriverNode {
    #[serde(rename = "@driverId")]
    pub driver_id: Option<String>,
    /// Three-letter code
    #[serde(rename = "@code")]
    pub code: Option<String>,
    pub permanent_number: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nationality: Option<String>,
}

/// `Constructor` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ConstructorNode {
    #[serde(rename = "@constructorId")]
    pub constructor_id: Option<String>,
    pub name: Option<String>,
    pub nationality: Option<String>,
}

/// `FastestLap` element
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct FastestLapNode {
    /// Rank of this lap among all fastest laps of the race
    #[serde(rename = "@rank")]
    pub rank: Option<String>,
    /// Lap number on which it was set
    #[serde(rename = "@lap")]
    pub lap: Option<String>,
    pub time: Option<TextNode>,
    pub average_speed: Option<TextNode>,
}
