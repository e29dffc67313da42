// src/aggregate/mod.rs

pub mod collate;
pub mod fields;

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, trace};

use crate::sheet::SheetTable;
pub use collate::locale_cmp;
pub use fields::{Field, ValidRow};

/// Per-province audience figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceSummary {
    pub province: String,
    pub total_population: f64,
    /// Mean composite score, rounded to 2 decimal places.
    pub avg_score: f64,
    /// Distinct geography codes seen for the province.
    pub geo_count: usize,
}

/// Aggregated output of one sheet load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSummary {
    pub data: Vec<ProvinceSummary>,
    pub total_audience: f64,
    pub total_postal_codes: usize,
}

impl AudienceSummary {
    pub fn from_provinces(data: Vec<ProvinceSummary>) -> Self {
        let total_audience = data.iter().fold(0.0, |acc, p| acc + p.total_population);
        let total_postal_codes = data.iter().map(|p| p.geo_count).sum();
        Self {
            data,
            total_audience,
            total_postal_codes,
        }
    }
}

#[derive(Debug, Default)]
struct ProvinceGroup {
    populations: Vec<f64>,
    scores: Vec<f64>,
    geo_codes: HashSet<String>,
}

impl ProvinceGroup {
    fn add(&mut self, row: ValidRow) {
        self.geo_codes.insert(row.geo_code);
        if row.population != 0.0 && row.composite_score != 0.0 {
            self.populations.push(row.population);
            self.scores.push(row.composite_score);
        }
    }

    fn summarize(self, province: String) -> ProvinceSummary {
        // folded from +0.0: an empty f64 `sum` yields -0.0
        let total_population = self.populations.iter().fold(0.0, |acc, n| acc + n);
        let avg_score = if self.scores.is_empty() {
            0.0
        } else {
            round2(self.scores.iter().fold(0.0, |acc, n| acc + n) / self.scores.len() as f64)
        };
        ProvinceSummary {
            province,
            total_population,
            avg_score,
            geo_count: self.geo_codes.len(),
        }
    }
}

/// Round half-up to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}

/// Rows that carry every field the aggregation needs, in sheet order.
pub fn valid_rows(table: &SheetTable) -> Vec<ValidRow> {
    table.rows.iter().filter_map(ValidRow::from_raw).collect()
}

/// Group valid rows by province and reduce each group to a summary, sorted by province name.
///
/// Rows whose population or score is zero still count toward the province's distinct
/// geography codes, but add nothing to its population or score average.
#[instrument(level = "info", skip(table), fields(rows = table.rows.len()))]
pub fn aggregate(table: &SheetTable) -> AudienceSummary {
    let valid = valid_rows(table);
    debug!(
        valid = valid.len(),
        dropped = table.rows.len() - valid.len(),
        "filtered rows"
    );

    let mut groups: HashMap<String, ProvinceGroup> = HashMap::new();
    for row in valid {
        groups.entry(row.province.clone()).or_default().add(row);
    }

    let mut data: Vec<ProvinceSummary> = groups
        .into_iter()
        .map(|(province, group)| group.summarize(province))
        .collect();
    data.sort_by(|a, b| locale_cmp(&a.province, &b.province));

    for p in &data {
        trace!(
            province = %p.province,
            total_population = p.total_population,
            avg_score = p.avg_score,
            geo_count = p.geo_count,
            "province summary"
        );
    }

    let summary = AudienceSummary::from_provinces(data);
    debug!(
        provinces = summary.data.len(),
        total_audience = summary.total_audience,
        total_postal_codes = summary.total_postal_codes,
        "aggregated"
    );
    summary
}
