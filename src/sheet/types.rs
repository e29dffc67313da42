// src/sheet/types.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single cell value as delivered by the sheet, after null/absent cells have been
/// defaulted to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Number substituted for a source cell that held no numeric value. Reads as a
    /// number but never counts as populated.
    Defaulted(f64),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// Converts a raw gviz `v` entry, keeping its native type.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => CellValue::empty(),
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_else(CellValue::empty),
            Value::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// True for anything other than an empty or whitespace-only string or a defaulted number.
    pub fn is_populated(&self) -> bool {
        match self {
            CellValue::Text(s) => !s.trim().is_empty(),
            CellValue::Number(n) => !n.is_nan(),
            CellValue::Bool(_) => true,
            CellValue::Defaulted(_) => false,
        }
    }

    /// Finite number carried by the cell, accepting numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) | CellValue::Defaulted(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    /// Display form used for keys such as province names and geography codes.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) | CellValue::Defaulted(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// One reconstructed row: header label → cell value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRow {
    fields: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `label`. A repeated label overwrites the earlier value in place.
    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) {
        let label = label.into();
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(l, _)| l.as_str())
    }
}

impl<L: Into<String>> FromIterator<(L, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (L, CellValue)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (label, value) in iter {
            row.insert(label, value);
        }
        row
    }
}

/// Parsed sheet contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetTable {
    /// Column labels, in sheet order.
    pub headers: Vec<String>,
    /// Data rows, in sheet order.
    pub rows: Vec<RawRow>,
}

// ----- gviz wire shapes -----

#[derive(Debug, Deserialize)]
pub(crate) struct GvizResponse {
    pub table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizTable {
    pub cols: Option<Vec<GvizColumn>>,
    pub rows: Option<Vec<GvizRow>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizColumn {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizRow {
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizCell {
    #[serde(default)]
    pub v: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_keep_native_type() {
        assert_eq!(CellValue::from_json(&json!("ON")), CellValue::Text("ON".into()));
        assert_eq!(CellValue::from_json(&json!(12)), CellValue::Number(12.0));
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Bool(true));
        assert_eq!(CellValue::from_json(&Value::Null), CellValue::empty());
    }

    #[test]
    fn populated_and_numeric() {
        assert!(!CellValue::Text("   ".into()).is_populated());
        assert!(CellValue::Number(0.0).is_populated());
        assert_eq!(CellValue::Text(" 4.5 ".into()).as_number(), Some(4.5));
        assert_eq!(CellValue::Text("n/a".into()).as_number(), None);
        assert_eq!(CellValue::Text("inf".into()).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Number(3.0).as_text(), "3");
    }

    #[test]
    fn defaulted_reads_as_number_but_is_unpopulated() {
        let cell = CellValue::Defaulted(0.0);
        assert!(!cell.is_populated());
        assert_eq!(cell.as_number(), Some(0.0));
        assert_eq!(serde_json::to_string(&cell).unwrap(), "0.0");
    }

    #[test]
    fn duplicate_label_last_write_wins() {
        let mut row = RawRow::new();
        row.insert("Geo", CellValue::Text("A1A".into()));
        row.insert("Province", CellValue::Text("Ontario".into()));
        row.insert("Geo", CellValue::Text("B2B".into()));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Geo"), Some(&CellValue::Text("B2B".into())));
        assert_eq!(row.labels().collect::<Vec<_>>(), vec!["Geo", "Province"]);
    }
}
