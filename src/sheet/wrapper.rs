// src/sheet/wrapper.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::error::SheetError;

/// Marker identifying the gviz callback wrapper.
pub const WRAPPER_MARKER: &str = "google.visualization.Query.setResponse";

/// `/*O_o*/\ngoogle.visualization.Query.setResponse(` and `);`.
const WRAPPER_PREFIX_LEN: usize = 47;
const WRAPPER_SUFFIX_LEN: usize = 2;

/// First `{` through last `}`.
static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern should compile"));

/// Fixed-width slice between the callback prefix and suffix.
pub fn slice_wrapper(text: &str) -> Option<&str> {
    let end = text.len().checked_sub(WRAPPER_SUFFIX_LEN)?;
    if end < WRAPPER_PREFIX_LEN {
        return None;
    }
    text.get(WRAPPER_PREFIX_LEN..end)
}

/// Outermost brace-delimited span, if any.
pub fn object_span(text: &str) -> Option<&str> {
    OBJECT_SPAN.find(text).map(|m| m.as_str())
}

/// Strip the response wrapper and parse what remains as JSON.
///
/// The fixed-width slice is tried first when the marker is present; the brace span is the
/// fallback, and its parse error is the one reported.
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn extract_json(text: &str) -> Result<Value, SheetError> {
    if text.contains(WRAPPER_MARKER) {
        match slice_wrapper(text).map(serde_json::from_str::<Value>) {
            Some(Ok(value)) => {
                debug!(strategy = "wrapper", "extracted payload");
                return Ok(value);
            }
            Some(Err(e)) => warn!(error = %e, "wrapper slice did not parse, trying brace span"),
            None => trace!("payload shorter than wrapper"),
        }
    }

    let candidate = object_span(text).unwrap_or(text);
    trace!(candidate_len = candidate.len(), "brace span");
    let value = serde_json::from_str::<Value>(candidate).map_err(|source| {
        warn!(error = %source, "sheet payload is not JSON");
        SheetError::Parse { source }
    })?;
    debug!(strategy = "brace-span", "extracted payload");
    Ok(value)
}
