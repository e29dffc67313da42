// src/sheet/parse.rs

use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use super::types::{CellValue, GvizResponse, RawRow, SheetTable};
use super::wrapper::extract_json;
use crate::error::SheetError;

/// Headers whose cells are always coerced to numbers.
pub const NUMERIC_HEADERS: &[&str] = &["Population", "Composite Score"];

/// Coerce a cell to `f64`, falling back to 0 for empty or non-numeric values.
pub fn coerce_number(value: &CellValue) -> f64 {
    value.as_number().unwrap_or(0.0)
}

/// Numeric form of a cell under a [`NUMERIC_HEADERS`] column. A cell with no numeric
/// value becomes [`CellValue::Defaulted`] so it still fails the populated check.
pub fn coerce_cell(value: &CellValue) -> CellValue {
    match value.as_number() {
        Some(n) => CellValue::Number(n),
        None => CellValue::Defaulted(coerce_number(value)),
    }
}

/// Parse a raw sheet response (wrapper included) into headers and rows.
#[instrument(level = "info", skip(text), fields(len = text.len()))]
pub fn parse_sheet(text: &str) -> Result<SheetTable, SheetError> {
    let json = extract_json(text)?;
    table_from_json(json)
}

/// Validate the gviz shape of an already-parsed payload and rebuild its rows.
pub fn table_from_json(json: Value) -> Result<SheetTable, SheetError> {
    let response: GvizResponse = serde_json::from_value(json).map_err(|e| {
        warn!(error = %e, "unexpected payload shape");
        SheetError::Structure
    })?;

    let table = response.table.ok_or_else(|| {
        warn!("payload has no table");
        SheetError::Structure
    })?;
    let (cols, rows) = match (table.cols, table.rows) {
        (Some(cols), Some(rows)) => (cols, rows),
        (cols, rows) => {
            warn!(
                has_cols = cols.is_some(),
                has_rows = rows.is_some(),
                "table is missing cols or rows"
            );
            return Err(SheetError::Structure);
        }
    };

    let headers: Vec<String> = cols
        .into_iter()
        .map(|c| c.label.unwrap_or_default())
        .collect();
    debug!(columns = headers.len(), rows = rows.len(), "table shape");

    let rows: Vec<RawRow> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut out = RawRow::new();
            for (pos, cell) in row.c.into_iter().enumerate() {
                let Some(header) = headers.get(pos) else {
                    trace!(row = idx, pos, "cell beyond last header ignored");
                    continue;
                };
                let value = cell
                    .map(|c| CellValue::from_json(&c.v))
                    .unwrap_or_else(CellValue::empty);
                let value = if NUMERIC_HEADERS.contains(&header.as_str()) {
                    coerce_cell(&value)
                } else {
                    value
                };
                out.insert(header.clone(), value);
            }
            if idx < 3 {
                trace!(row = idx, fields = out.len(), "sample row");
            }
            out
        })
        .collect();

    debug!(rows = rows.len(), "rebuilt sheet rows");
    Ok(SheetTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_pair_cells_with_headers() {
        let json = json!({
            "table": {
                "cols": [{"label": "Geo"}, {"label": "Province"}, {"label": "Segment"}],
                "rows": [
                    {"c": [{"v": "M5V"}, {"v": "Ontario"}, null]},
                    {"c": [{"v": "H2X"}, {}]}
                ]
            }
        });
        let table = table_from_json(json).unwrap();
        assert_eq!(table.headers, vec!["Geo", "Province", "Segment"]);
        assert_eq!(table.rows.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.get("Province"), Some(&CellValue::Text("Ontario".into())));
        assert_eq!(first.get("Segment"), Some(&CellValue::empty()));

        let second = &table.rows[1];
        assert_eq!(second.get("Province"), Some(&CellValue::empty()));
        assert_eq!(second.get("Segment"), None);
    }

    #[test]
    fn numeric_headers_are_coerced() {
        let json = json!({
            "table": {
                "cols": [
                    {"label": "Population"},
                    {"label": "Composite Score"},
                    {"label": "  Composite Score"},
                    {"label": "Geo"}
                ],
                "rows": [
                    {"c": [{"v": "1200"}, {"v": 4.25}, {"v": "3.5"}, {"v": 0}]},
                    {"c": [{"v": ""}, null, {"v": "x"}, {"v": "T0A"}]},
                    {"c": [{"v": "lots"}, {"v": true}]}
                ]
            }
        });
        let table = table_from_json(json).unwrap();

        let r = &table.rows[0];
        assert_eq!(r.get("Population"), Some(&CellValue::Number(1200.0)));
        assert_eq!(r.get("Composite Score"), Some(&CellValue::Number(4.25)));
        // leading-space variant is not coerced here
        assert_eq!(r.get("  Composite Score"), Some(&CellValue::Text("3.5".into())));
        assert_eq!(r.get("Geo"), Some(&CellValue::Number(0.0)));

        let r = &table.rows[1];
        assert_eq!(r.get("Population"), Some(&CellValue::Defaulted(0.0)));
        assert_eq!(r.get("Composite Score"), Some(&CellValue::Defaulted(0.0)));
        assert!(!r.get("Population").unwrap().is_populated());
        assert_eq!(coerce_number(r.get("Population").unwrap()), 0.0);

        let r = &table.rows[2];
        assert_eq!(r.get("Population"), Some(&CellValue::Defaulted(0.0)));
        assert_eq!(r.get("Composite Score"), Some(&CellValue::Defaulted(0.0)));
    }

    #[test]
    fn blank_numeric_cells_do_not_make_a_row_valid() {
        let body = json!({
            "table": {
                "cols": [
                    {"label": "Province"},
                    {"label": "Geo"},
                    {"label": "Population"},
                    {"label": "Composite Score"},
                    {"label": "Gen Z Fresh Explorers Province"},
                    {"label": crate::aggregate::fields::GEN_Z_POPULATION}
                ],
                "rows": [
                    {"c": [{"v": "Ontario"}, {"v": "M5V"}, {"v": ""}, {"v": "4.0"}]},
                    {"c": [null, {"v": "T5J"}, null, {"v": null}, {"v": "Alberta"}, {"v": 80}]}
                ]
            }
        });
        let wrapped = format!("/*O_o*/\ngoogle.visualization.Query.setResponse({});", body);
        let out = crate::aggregate::aggregate(&parse_sheet(&wrapped).unwrap());
        assert!(out.data.is_empty());
        assert_eq!(out.total_postal_codes, 0);
        assert_eq!(out.total_audience, 0.0);
    }

    #[test]
    fn missing_cols_or_rows_is_structure_error() {
        for json in [
            json!({"status": "error"}),
            json!({"table": {"rows": []}}),
            json!({"table": {"cols": []}}),
            json!({"table": "nope"}),
            json!({"table": {"cols": [{"label": "Geo"}], "rows": [{"cells": []}]}}),
        ] {
            assert!(matches!(table_from_json(json), Err(SheetError::Structure)));
        }
    }

    #[test]
    fn wrapped_and_bare_payloads_agree() {
        let body = r#"{"table":{"cols":[{"label":"Geo"},{"label":"Population"}],"rows":[{"c":[{"v":"V6B"},{"v":"42"}]}]}}"#;
        let wrapped = format!("/*O_o*/\ngoogle.visualization.Query.setResponse({});", body);
        assert_eq!(parse_sheet(&wrapped).unwrap(), parse_sheet(body).unwrap());
    }

    #[test]
    fn empty_table_is_fine() {
        let table = parse_sheet(r#"{"table":{"cols":[],"rows":[]}}"#).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
