//! Provider trait for results feed sources

use crate::Result;
use crate::types::{RaceListing, Round, Season};

/// Trait for results feed sources
///
/// Providers abstract over where feed documents come from (the remote feed,
/// recorded fixtures). They perform no interpretation beyond transport: the
/// results body is handed to [`crate::ResultsNormalizer`] untouched.
#[async_trait::async_trait]
pub trait ResultsProvider: Send + Sync + 'static {
    /// Fetch the raw results document for one round.
    ///
    /// Returns:
    /// - `Ok(body)` - Response body, not yet validated
    /// - `Err(RaceboardError::Transport { .. })` - Request failed or non-success status
    async fn fetch_results(&self, season: Season, round: Round) -> Result<String>;

    /// Fetch the race listing of a season, for the season/round picker.
    async fn fetch_races(&self, season: Season) -> Result<Vec<RaceListing>>;

    /// Human-readable description of the source, for logs.
    fn describe(&self) -> String;
}
