//! Race results normalization, ordering and caching for the Ergast-style
//! motorsport feed.
//!
//! Raceboard fetches one `MRData` results document per season/round, turns
//! every `Result` element into a display-ready [`ResultRecord`], groups the
//! records by driver and exposes them to a presentation layer in either
//! classification or fastest-lap order.
//!
//! # Pipeline
//!
//! ```text
//! ResultsProvider ──► ResultsNormalizer ──► RaceResultSet ──► order() ──► OrderedResults
//!                                               │
//!                                               └──► ResultCache (last good set)
//! ```
//!
//! [`ResultsBoard`] wires the pipeline together for a UI: it paints the cached
//! set first and replaces it with fresh data when a fetch completes.
//!
//! # Example
//!
//! ```rust,no_run
//! use raceboard::{Raceboard, RaceboardConfig, Round, Season};
//!
//! #[tokio::main]
//! async fn main() -> raceboard::Result<()> {
//!     let config = RaceboardConfig::load(None)?;
//!     let mut board = Raceboard::board(&config)?;
//!
//!     board.select(Season::Year(2023), Round::Number(22)).await.ok();
//!     if let Some(view) = board.toggle_sort() {
//!         println!("{}", raceboard::render_table(&view));
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod board;
pub mod cache;
pub mod config;
mod error;
pub mod feed;
pub mod normalizer;
pub mod orderer;
pub mod provider;
pub mod providers;
pub mod render;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

pub use board::{BoardState, Origin, ResultsBoard};
pub use cache::{FileCache, MemoryCache, ResultCache};
pub use config::RaceboardConfig;
pub use error::*;
pub use normalizer::{DuplicatePolicy, ResultsNormalizer};
pub use orderer::{OrderedResults, OrderedRow, SortMode, order, parse_lap_time};
pub use provider::ResultsProvider;
pub use providers::{FixtureProvider, HttpProvider};
pub use render::render_table;
pub use types::*;

/// Entry point assembling the pipeline from a [`RaceboardConfig`].
pub struct Raceboard;

impl Raceboard {
    /// The provider the configuration selects: recorded fixtures when
    /// `fixture_dir` is set, the remote feed otherwise.
    pub fn provider(config: &RaceboardConfig) -> Result<Arc<dyn ResultsProvider>> {
        match &config.fixture_dir {
            Some(dir) => Ok(Arc::new(FixtureProvider::new(dir))),
            None => Ok(Arc::new(HttpProvider::new(config.base_url.clone())?)),
        }
    }

    /// The on-disk snapshot cache under `cache_dir`.
    pub fn cache(config: &RaceboardConfig) -> Arc<dyn ResultCache> {
        Arc::new(FileCache::new(&config.cache_dir))
    }

    /// A board with the cached snapshot already published.
    ///
    /// # Errors
    ///
    /// Returns [`RaceboardError::Config`] when the base URL is unusable.
    pub fn board(config: &RaceboardConfig) -> Result<ResultsBoard> {
        Ok(ResultsBoard::new(
            Self::provider(config)?,
            Self::cache(config),
            ResultsNormalizer::new(config.duplicate_policy),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_dir;

    #[tokio::test]
    async fn fixture_configured_board_loads_and_caches() {
        let cache_dir = tempfile::tempdir().unwrap();
        let config = RaceboardConfig {
            cache_dir: cache_dir.path().to_path_buf(),
            fixture_dir: Some(fixture_dir()),
            ..Default::default()
        };

        let mut board = Raceboard::board(&config).unwrap();
        assert_eq!(board.state(), BoardState::Idle);
        board.select(Season::Year(2023), Round::Number(22)).await.unwrap();

        let results = board.state().results().cloned().unwrap();
        assert_eq!(results.race.race_name, "Abu Dhabi Grand Prix");

        // A second board over the same directory paints from the snapshot
        let second = Raceboard::board(&config).unwrap();
        assert!(matches!(second.state(), BoardState::Ready { origin: Origin::Cache, .. }));
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = RaceboardConfig { base_url: "ftp://feed".to_string(), ..Default::default() };
        assert!(matches!(Raceboard::provider(&config), Err(RaceboardError::Config { .. })));
    }
}
