// src/error.rs

use thiserror::Error;

/// Terminal failures of a single sheet load. Row-level problems never end up here;
/// they only drop the offending row.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    FetchStatus { status: u16 },

    /// The request never produced a usable response.
    #[error("request failed: {source}")]
    FetchTransport {
        #[source]
        source: reqwest::Error,
    },

    /// Neither wrapper-extraction strategy produced valid JSON.
    #[error("failed to parse sheet response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// The JSON parsed but does not describe a table with `cols` and `rows`.
    #[error("invalid data structure from sheet response")]
    Structure,
}

impl SheetError {
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            SheetError::FetchStatus { .. } | SheetError::FetchTransport { .. }
        )
    }
}
