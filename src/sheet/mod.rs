pub mod parse;
pub mod types;
pub mod wrapper;

pub use parse::{coerce_cell, coerce_number, parse_sheet, table_from_json, NUMERIC_HEADERS};
pub use types::{CellValue, RawRow, SheetTable};
pub use wrapper::extract_json;
