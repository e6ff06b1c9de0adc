//! Core types for normalized race results.
//!
//! This module provides the data model shared by the normalizer, the orderer,
//! the cache and the presentation layer:
//! - [`RaceResultSet`] holds race metadata plus per-driver records in
//!   official classification order
//! - [`ResultRecord`] is one driver's finishing record with every display
//!   field already derived
//! - [`Season`] and [`Round`] select which document the feed returns
//!
//! ## Usage Example
//!
//! ```rust
//! use raceboard::types::{DriverResults, RaceMetadata, RaceResultSet, ResultRecord};
//!
//! let record = ResultRecord {
//!     driver_key: "Lewis Hamilton".to_string(),
//!     finish_position: "1".to_string(),
//!     grid_position: "2".to_string(),
//!     constructor_name: "Mercedes".to_string(),
//!     display_time: "1:32:11.986".to_string(),
//!     fastest_lap_time: "1:18.750".to_string(),
//!     fastest_lap_rank: "1".to_string(),
//! };
//!
//! let set = RaceResultSet::new(RaceMetadata::default(), vec![DriverResults::new(record)]);
//! assert!(set.get("Lewis Hamilton").unwrap().primary().has_fastest_lap());
//! ```

mod results;
mod selection;

pub use results::{
    DISQUALIFIED, DriverResults, NOT_AVAILABLE, PIT_LANE_START, RaceMetadata, RaceResultSet,
    ResultRecord,
};
pub use selection::{RaceListing, Round, Season};
