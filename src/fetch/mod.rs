// src/fetch/mod.rs

use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::SheetError;

/// Published gviz query endpoint for the audience sheet.
pub const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1fV8LKMMfcVofS5Z9Nx8dYtPlICZm8QkyRHaY8tx4dqw/gviz/tq?tqx=out:json&gid=1452605069";

/// HTTP client used for sheet loads.
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// Single GET against `url`, returning the body text. No retries.
#[instrument(level = "info", skip(client), fields(url = %url))]
pub async fn fetch_sheet_text(client: &Client, url: &Url) -> Result<String, SheetError> {
    debug!("fetching sheet payload");
    let resp = client.get(url.clone()).send().await.map_err(|source| {
        warn!(error = %source, "request failed");
        SheetError::FetchTransport { source }
    })?;

    let status = resp.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "non-success status");
        return Err(SheetError::FetchStatus {
            status: status.as_u16(),
        });
    }

    let text = resp
        .text()
        .await
        .map_err(|source| SheetError::FetchTransport { source })?;
    debug!(len = text.len(), "received payload");
    Ok(text)
}
