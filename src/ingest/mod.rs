/// Upstream data sources for the risk engine.
///
/// - `open_meteo` - forecast and flood API: URL construction, JSON parsing,
///   blocking fetches.
/// - `fixtures` (test only) - representative API response payloads.
///
/// Other providers get their own file here rather than growing
/// `open_meteo`.

pub mod fixtures;
pub mod open_meteo;

use thiserror::Error;

/// Failures talking to, or understanding, an upstream provider.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("upstream API error: {0}")]
    Api(String),

    #[error("could not parse upstream response: {0}")]
    Parse(String),
}
