//! Results feed provider implementations

pub mod fixture;
pub mod http;

pub use fixture::FixtureProvider;
pub use http::{DEFAULT_BASE_URL, HttpProvider};
