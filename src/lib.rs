pub mod activate;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod sheet;
pub mod state;

#[cfg(test)]
mod test_support;

pub use aggregate::{aggregate, AudienceSummary, ProvinceSummary};
pub use config::Config;
pub use error::SheetError;
pub use sheet::{parse_sheet, SheetTable};
pub use state::{run_pipeline, spawn_load, LoadState, SheetData, SheetDataHandle};
