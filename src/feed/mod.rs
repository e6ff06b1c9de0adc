//! # Results Feed Document
//!
//! Serde model of the `MRData` XML document served by the results feed, for
//! both the per-round results endpoint and the season race listing. The model
//! mirrors the feed as-is: every field is optional and no value is
//! interpreted here. Interpretation (defaults, sentinels, status/time
//! reconciliation) belongs to [`crate::normalizer`].
//!
//! ```text
//! <MRData series="f1" total="20">
//!   <RaceTable season="2023" round="22">
//!     <Race season="2023" round="22">
//!       <RaceName>Abu Dhabi Grand Prix</RaceName>
//!       <Circuit circuitId="yas_marina">
//!         <CircuitName>Yas Marina Circuit</CircuitName>
//!         <Location><Locality>Abu Dhabi</Locality><Country>UAE</Country></Location>
//!       </Circuit>
//!       <Date>2023-11-26</Date>
//!       <ResultsList>
//!         <Result number="1" position="1" positionText="1" points="26">...</Result>
//!       </ResultsList>
//!     </Race>
//!   </RaceTable>
//! </MRData>
//! ```
//!
//! Attributes are mapped with quick-xml's `@name` convention, element text
//! with `$text`. Unknown elements and attributes are ignored so additions to
//! the feed do not break parsing.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod race;
pub mod result;

pub use race::{Circuit, Location, Race, RaceTable, ResultsList};
pub use result::{ConstructorNode, DriverNode, FastestLapNode, RawResult, TextNode};

use crate::types::{NOT_AVAILABLE, RaceListing};
use crate::{RaceboardError, Result};

/// Name of the feed document's root element.
pub const ROOT_ELEMENT: &str = "MRData";

/// Root `MRData` element of a feed response
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RaceDocument {
    /// Series identifier (e.g. "f1")
    #[serde(rename = "@series", default)]
    pub series: Option<String>,
    /// Total number of matching items on the server
    #[serde(rename = "@total", default)]
    pub total: Option<String>,
    /// The race table; required for the document to count as a feed document
    pub race_table: RaceTable,
}

impl RaceDocument {
    /// Parse a feed response body.
    ///
    /// Fails with [`RaceboardError::MalformedDocument`] when the body is not
    /// XML, its root element is not `MRData`, or it lacks a `RaceTable`. A
    /// well-formed document with no races is *not* an error here.
    pub fn parse(xml: &str) -> Result<Self> {
        let body = xml.trim_start_matches('\u{feff}').trim();
        if body.is_empty() {
            return Err(RaceboardError::malformed(ROOT_ELEMENT, "response body is empty"));
        }

        ensure_root_element(body)?;
        let document: RaceDocument = quick_xml::de::from_str(body)?;
        debug!(
            races = document.race_table.races.len(),
            season = document.race_table.season.as_deref().unwrap_or(NOT_AVAILABLE),
            "Parsed results feed document"
        );
        Ok(document)
    }

    /// The race a per-round results document is about.
    pub fn first_race(&self) -> Option<&Race> {
        self.race_table.races.first()
    }

    /// Convert a season listing document into picker entries.
    ///
    /// Races whose `round` attribute is missing or not a number are skipped.
    pub fn race_listings(&self) -> Vec<RaceListing> {
        self.race_table
            .races
            .iter()
            .filter_map(|race| {
                let round = race.round.as_deref().map(str::trim).and_then(|r| r.parse().ok());
                let Some(round) = round else {
                    warn!(round = ?race.round, "Skipping race listing without a numeric round");
                    return None;
                };
                Some(RaceListing {
                    round,
                    race_name: non_empty(race.race_name.as_deref())
                        .unwrap_or(NOT_AVAILABLE)
                        .to_string(),
                    date: non_empty(race.date.as_deref()).unwrap_or(NOT_AVAILABLE).to_string(),
                })
            })
            .collect()
    }
}

/// The deserializer ignores the root element's name, so check it up front.
fn ensure_root_element(body: &str) -> Result<()> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                let name = element.local_name();
                if name.as_ref() == ROOT_ELEMENT.as_bytes() {
                    return Ok(());
                }
                return Err(RaceboardError::malformed(
                    ROOT_ELEMENT,
                    format!("unexpected root element <{}>", String::from_utf8_lossy(name.as_ref())),
                ));
            }
            Ok(Event::Eof) => {
                return Err(RaceboardError::malformed(ROOT_ELEMENT, "no root element"));
            }
            Ok(_) => {}
            Err(e) => return Err(RaceboardError::malformed(ROOT_ELEMENT, e.to_string())),
        }
    }
}

/// Trimmed text, or `None` when absent or blank.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
