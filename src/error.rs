//! Error types for conflation runs.
//!
//! The core stages (clamp, overlay, cleanup, rollup) never fail. Errors come
//! from input validation in the pipeline driver and from file handling.

use crate::Domain;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConflateError>;

#[derive(Debug, thiserror::Error)]
pub enum ConflateError {
    /// An interval has a non-finite bound or is not strictly increasing.
    #[error("invalid {domain} interval at index {index}: [{from}, {to})")]
    InvalidInterval {
        domain: Domain,
        index: usize,
        from: f64,
        to: f64,
    },

    /// An interval set is not sorted ascending by start position.
    #[error("{domain} intervals are not sorted by start position (index {index})")]
    UnorderedInput { domain: Domain, index: usize },

    /// Two intervals of the same domain overlap.
    #[error("{domain} intervals overlap at index {index}")]
    OverlappingInput { domain: Domain, index: usize },

    #[error("route not found: {0}")]
    UnknownRoute(String),

    #[error("invalid route id '{0}': expected '<root> <NB|SB|EB|WB>'")]
    InvalidRouteId(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convert missing lookups into conflation errors.
pub trait OptionExt<T> {
    fn ok_or_unknown_route(self, route_id: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_unknown_route(self, route_id: &str) -> Result<T> {
        self.ok_or_else(|| ConflateError::UnknownRoute(route_id.to_string()))
    }
}
