// src/state.rs

use reqwest::Client;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::aggregate::{aggregate, AudienceSummary, ProvinceSummary};
use crate::error::SheetError;
use crate::fetch::fetch_sheet_text;
use crate::sheet::parse_sheet;

/// Fetch, parse and aggregate the sheet once.
#[instrument(level = "info", skip(client), fields(url = %url))]
pub async fn run_pipeline(client: &Client, url: &Url) -> Result<AudienceSummary, SheetError> {
    let text = fetch_sheet_text(client, url).await?;
    let table = parse_sheet(&text)?;
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed sheet"
    );
    Ok(aggregate(&table))
}

/// Where a load currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Pending,
    Ready(AudienceSummary),
    Failed(String),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoadState::Pending => "Pending",
            LoadState::Ready(_) => "Ready",
            LoadState::Failed(_) => "Failed",
        }
    }
}

impl From<Result<AudienceSummary, SheetError>> for LoadState {
    fn from(outcome: Result<AudienceSummary, SheetError>) -> Self {
        match outcome {
            Ok(summary) => LoadState::Ready(summary),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }
}

/// Snapshot handed to consumers of the sheet data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub data: Vec<ProvinceSummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub total_audience: f64,
    pub total_postal_codes: usize,
}

impl From<&LoadState> for SheetData {
    fn from(state: &LoadState) -> Self {
        let (data, loading, error) = match state {
            LoadState::Pending => (Vec::new(), true, None),
            LoadState::Ready(summary) => (summary.data.clone(), false, None),
            LoadState::Failed(msg) => (Vec::new(), false, Some(msg.clone())),
        };
        // totals always follow whatever `data` holds
        let AudienceSummary {
            data,
            total_audience,
            total_postal_codes,
        } = AudienceSummary::from_provinces(data);
        SheetData {
            data,
            loading,
            error,
            total_audience,
            total_postal_codes,
        }
    }
}

/// Observer side of a load started with [`spawn_load`].
#[derive(Debug, Clone)]
pub struct SheetDataHandle {
    rx: watch::Receiver<LoadState>,
}

impl SheetDataHandle {
    /// Current state without waiting.
    pub fn snapshot(&self) -> SheetData {
        SheetData::from(&*self.rx.borrow())
    }

    /// Wait for the load to finish, then return its outcome.
    pub async fn settled(&mut self) -> SheetData {
        let settled = self
            .rx
            .wait_for(|s| !s.is_pending())
            .await
            .map(|s| SheetData::from(&*s));
        settled.unwrap_or_else(|_| {
            error!("load task ended without publishing a result");
            SheetData::from(&LoadState::Failed("load task ended unexpectedly".into()))
        })
    }
}

/// Start a load on the current runtime. Observers can come and go; if every handle is
/// dropped before the load settles, the result is discarded.
pub fn spawn_load(client: Client, url: Url) -> SheetDataHandle {
    let (tx, rx) = watch::channel(LoadState::Pending);
    tokio::spawn(async move {
        let outcome = run_pipeline(&client, &url).await;
        if let Err(e) = &outcome {
            error!(error = %e, "error fetching sheet data");
        }
        let state = LoadState::from(outcome);
        let label = state.as_str().to_owned();
        if tx.send(state).is_err() {
            debug!(state = %label, "load settled with no observers left");
        }
    });
    SheetDataHandle { rx }
}
