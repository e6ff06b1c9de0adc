//! Fixture provider for recorded feed documents

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::feed::RaceDocument;
use crate::provider::ResultsProvider;
use crate::types::{RaceListing, Round, Season};
use crate::{RaceboardError, Result};

/// Provider that serves feed documents from a directory
///
/// Files are named `<season>-<round>-results.xml` and `<season>-races.xml`,
/// using the same path segments as the remote feed (`current-last-results.xml`,
/// `2023-22-results.xml`, `2023-races.xml`). A missing file behaves like a
/// failed request.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    dir: PathBuf,
}

impl FixtureProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        info!(dir = %dir.display(), "Fixture results provider ready");
        Self { dir }
    }

    pub fn results_path(&self, season: Season, round: Round) -> PathBuf {
        self.dir.join(format!("{}-{}-results.xml", season, round))
    }

    pub fn races_path(&self, season: Season) -> PathBuf {
        self.dir.join(format!("{}-races.xml", season))
    }

    async fn read(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "Reading feed fixture");
        tokio::fs::read_to_string(path).await.map_err(|e| {
            RaceboardError::transport_with_source(
                format!("fixture {} unavailable", path.display()),
                Box::new(e),
            )
        })
    }
}

#[async_trait::async_trait]
impl ResultsProvider for FixtureProvider {
    async fn fetch_results(&self, season: Season, round: Round) -> Result<String> {
        self.read(&self.results_path(season, round)).await
    }

    async fn fetch_races(&self, season: Season) -> Result<Vec<RaceListing>> {
        let body = self.read(&self.races_path(season)).await?;
        Ok(RaceDocument::parse(&body)?.race_listings())
    }

    fn describe(&self) -> String {
        format!("fixtures at {}", self.dir.display())
    }
}
