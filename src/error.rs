//! Error types for result loading and normalization.
//!
//! Every failure the core can produce is a [`RaceboardError`]. The variants map
//! one-to-one onto the situations the presentation layer has to message
//! differently:
//!
//! - **Transport**: the fetch itself failed (network or non-success status)
//! - **Malformed document**: the response is not a results feed document
//! - **Empty result set**: the document is valid but lists no result blocks
//! - **Duplicate driver**: strict grouping found a driver twice
//! - **Cache / Serialization**: the snapshot could not be written or cleared
//! - **Config**: configuration could not be read or is invalid
//!
//! Cache *reads* never produce an error: a missing or corrupt snapshot is a
//! cache miss (see [`crate::cache`]).
//!
//! ```rust
//! use raceboard::{RaceboardError, Round, Season};
//!
//! let error = RaceboardError::empty_result_set(Season::Year(2023), Round::Number(4));
//! assert!(error.is_no_data());
//! assert_eq!(error.user_message(), "No results available for this race");
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Round, Season};

/// Result type alias for raceboard operations.
pub type Result<T, E = RaceboardError> = std::result::Result<T, E>;

/// Main error type for raceboard operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RaceboardError {
    #[error("Failed to retrieve results: {reason}")]
    Transport {
        reason: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Malformed results document in {context}: {details}")]
    MalformedDocument { context: String, details: String },

    #[error("No result blocks for season {season}, round {round}")]
    EmptyResultSet { season: String, round: String },

    #[error("Driver '{driver_key}' appears more than once in the results")]
    DuplicateDriver { driver_key: String },

    #[error("Cache file error: {path}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed: {details}")]
    Serialization { details: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl RaceboardError {
    /// Returns whether re-issuing the same request might succeed.
    ///
    /// Nothing in the crate retries automatically; this only informs the
    /// message shown next to the "try again" affordance.
    pub fn is_retryable(&self) -> bool {
        match self {
            RaceboardError::Transport { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 429,
                None => true,
            },
            RaceboardError::MalformedDocument { .. } => false,
            RaceboardError::EmptyResultSet { .. } => false,
            RaceboardError::DuplicateDriver { .. } => false,
            RaceboardError::Cache { .. } => true,
            RaceboardError::Serialization { .. } => false,
            RaceboardError::Config { .. } => false,
        }
    }

    /// True when the error means "there is nothing to show" rather than
    /// "something is broken".
    pub fn is_no_data(&self) -> bool {
        matches!(self, RaceboardError::EmptyResultSet { .. })
    }

    /// Short message suitable for display in place of the results table.
    pub fn user_message(&self) -> &'static str {
        match self {
            RaceboardError::Transport { .. } => "Could not retrieve data",
            RaceboardError::MalformedDocument { .. } => {
                "The results feed returned an unreadable document"
            }
            RaceboardError::EmptyResultSet { .. } => "No results available for this race",
            RaceboardError::DuplicateDriver { .. } => "The results feed lists a driver twice",
            RaceboardError::Cache { .. } | RaceboardError::Serialization { .. } => {
                "Could not store the latest results"
            }
            RaceboardError::Config { .. } => "Invalid configuration",
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RaceboardError::Transport { .. } => vec![
                "Check the network connection",
                "Verify the results feed base URL",
                "Select the season and round again",
            ],
            RaceboardError::MalformedDocument { .. } => vec![
                "Verify the base URL points at a results feed",
                "Check whether the feed has changed its document format",
            ],
            RaceboardError::EmptyResultSet { .. } => vec![
                "Check that the selected round has been run",
                "Select a different season or round",
            ],
            RaceboardError::DuplicateDriver { .. } => vec![
                "Switch the duplicate policy to first-wins",
                "Report the duplicated entry to the feed maintainers",
            ],
            RaceboardError::Cache { .. } => vec![
                "Check that the cache directory is writable",
                "Ensure sufficient disk space",
            ],
            RaceboardError::Serialization { .. } => vec!["Clear the cache and reload"],
            RaceboardError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Check RACEBOARD_* environment variables",
            ],
        }
    }

    /// Helper constructor for transport failures without an HTTP status.
    pub fn transport(reason: impl Into<String>) -> Self {
        RaceboardError::Transport { reason: reason.into(), status: None, source: None }
    }

    /// Helper constructor for transport failures with an underlying cause.
    pub fn transport_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        RaceboardError::Transport { reason: reason.into(), status: None, source: Some(source) }
    }

    /// Helper constructor for non-success response statuses.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        RaceboardError::Transport {
            reason: format!("{} returned status {}", url.into(), status),
            status: Some(status),
            source: None,
        }
    }

    /// Helper constructor for documents that do not have the expected shape.
    pub fn malformed(context: impl Into<String>, details: impl Into<String>) -> Self {
        RaceboardError::MalformedDocument { context: context.into(), details: details.into() }
    }

    /// Helper constructor for documents without result blocks.
    pub fn empty_result_set(season: Season, round: Round) -> Self {
        RaceboardError::EmptyResultSet { season: season.to_string(), round: round.to_string() }
    }

    /// Helper constructor for cache I/O failures.
    pub fn cache_error(path: PathBuf, source: std::io::Error) -> Self {
        RaceboardError::Cache { path, source }
    }

    /// Helper constructor for configuration problems.
    pub fn config(reason: impl Into<String>) -> Self {
        RaceboardError::Config { reason: reason.into() }
    }
}

impl From<reqwest::Error> for RaceboardError {
    fn from(err: reqwest::Error) -> Self {
        RaceboardError::Transport {
            reason: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<quick_xml::DeError> for RaceboardError {
    fn from(err: quick_xml::DeError) -> Self {
        RaceboardError::MalformedDocument {
            context: "MRData deserialization".to_string(),
            details: err.to_string(),
        }
    }
}
