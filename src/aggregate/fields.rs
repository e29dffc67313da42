//! Accepted source column names for each field the aggregator reads.
//!
//! The sheet has carried several header spellings for the same field over time (one per
//! audience persona, and a score header with stray leading whitespace). Each field lists its
//! accepted names in priority order; the first populated one wins and the others are never
//! consulted.

use crate::sheet::{CellValue, RawRow};

/// Fresh Expressors persona population column.
pub const FRESH_EXPRESSORS_POPULATION: &str = "Socially active individuals who see gum as a confidence booster and personal care essential. Often purchase mint or fruity gum before social events or commutes. High engagement on Instagram and TikTok, follow grooming and lifestyle influencers Population";

/// Gen Z Fresh Explorers persona population column.
pub const GEN_Z_POPULATION: &str = "Gen Z and young adults (age 15-32), including students and young professionals, motivated by originality and freshness, they value wellness, convenience, fun, and innovative flavors They seek sugar-free and trending novelty gum flavors Population";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Province,
    GeoCode,
    Population,
    CompositeScore,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Province,
        Field::GeoCode,
        Field::Population,
        Field::CompositeScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Province => "province",
            Field::GeoCode => "geo",
            Field::Population => "population",
            Field::CompositeScore => "compositeScore",
        }
    }

    pub fn source_names(&self) -> &'static [&'static str] {
        match self {
            Field::Province => &[
                "Fresh Expressors Province",
                "Gen Z Fresh Explorers Province",
                "Province",
            ],
            Field::GeoCode => &["Geo"],
            Field::Population => &[FRESH_EXPRESSORS_POPULATION, GEN_Z_POPULATION, "Population"],
            Field::CompositeScore => &["  Composite Score", "Composite Score"],
        }
    }

    /// First populated cell among this field's source columns.
    pub fn resolve<'r>(&self, row: &'r RawRow) -> Option<&'r CellValue> {
        self.source_names()
            .iter()
            .filter_map(|name| row.get(name))
            .find(|v| v.is_populated())
    }
}

/// A row with every field the aggregator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRow {
    pub province: String,
    pub geo_code: String,
    pub population: f64,
    pub composite_score: f64,
}

impl ValidRow {
    /// `None` when any field is missing, or when a numeric field resolves to a non-number.
    pub fn from_raw(row: &RawRow) -> Option<Self> {
        let province = Field::Province.resolve(row)?.as_text();
        let geo_code = Field::GeoCode.resolve(row)?.as_text();
        let population = Field::Population.resolve(row)?.as_number()?;
        let composite_score = Field::CompositeScore.resolve(row)?.as_number()?;
        Some(Self {
            province,
            geo_code,
            population,
            composite_score,
        })
    }
}
