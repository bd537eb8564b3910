// ============================================================
// RECORD TYPES
// ============================================================
// Data structures representing parsed spreadsheet content

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single typed cell value extracted from a spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    /// Whether the cell carries no usable value
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Interpret the cell as an integer if possible
    ///
    /// Excel stores ids as floats, so integral floats are accepted.
    /// Text values are parsed after trimming.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Number(f) if f.fract() == 0.0 && f.abs() < 9e15 => Some(*f as i64),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.abs() < 9e15)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }

    /// Interpret the cell as a float if possible
    /// Text values may use thousands separators (e.g. "1,500.50")
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(f) => Some(*f),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<f64>()
                    .ok()
                    .or_else(|| trimmed.replace(',', "").parse::<f64>().ok())
            }
            _ => None,
        }
    }

    /// Interpret the cell as a date-time if possible
    /// Text values are matched against the date formats the source
    /// system exports (ISO and Indian day-first variants).
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(s) => parse_datetime_text(s.trim()),
            _ => None,
        }
    }

    /// Render the cell as display text (used for warnings and name maps)
    /// Integral floats render without a trailing ".0" so that ids key
    /// consistently across typed and untyped files.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Number(f) => {
                if f.fract() == 0.0 && f.abs() < 9e15 {
                    format!("{}", *f as i64)
                } else {
                    format!("{}", f)
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// A mapping from header name to cell value, reconstructed per data row
///
/// Empty cells are omitted rather than stored, so `has_value` doubles as
/// a presence check. Category processors mutate records in place before
/// accepting or rejecting them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record by zipping headers with row cells
    /// Cells without a header and empty cells are dropped.
    pub fn from_row(headers: &[String], cells: &[CellValue]) -> Self {
        let fields = headers
            .iter()
            .zip(cells.iter())
            .filter(|(header, cell)| !header.trim().is_empty() && !cell.is_empty())
            .map(|(header, cell)| (header.clone(), cell.clone()))
            .collect();

        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    /// Get a field rendered as display text, if present and non-empty
    pub fn get_display(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_display_string())
    }

    pub fn set(&mut self, field: &str, value: CellValue) {
        self.fields.insert(field.to_string(), value);
    }

    /// Whether the field is present with a non-empty value
    pub fn has_value(&self, field: &str) -> bool {
        self.fields.get(field).map_or(false, |v| !v.is_empty())
    }

    /// Whether any of the given fields is present with a non-empty value
    pub fn has_any_value(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.has_value(f))
    }

    /// Whether every field of the record is empty
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }

    /// Trim whitespace from every text field in place
    pub fn trim_text_fields(&mut self) {
        for value in self.fields.values_mut() {
            if let CellValue::Text(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *value = CellValue::Text(trimmed.to_string());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One header-row + data-row table extracted from a spreadsheet sheet
///
/// Rows where every cell is empty are filtered out before this stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_as_i64_accepts_integral_floats() {
        assert_eq!(CellValue::Number(101.0).as_i64(), Some(101));
        assert_eq!(CellValue::Number(101.5).as_i64(), None);
        assert_eq!(CellValue::Text(" 101 ".to_string()).as_i64(), Some(101));
        assert_eq!(CellValue::Text("abc".to_string()).as_i64(), None);
    }

    #[test]
    fn test_as_f64_strips_thousands_separators() {
        assert_eq!(CellValue::Text("1,500.50".to_string()).as_f64(), Some(1500.5));
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
    }

    #[test]
    fn test_datetime_text_parsing() {
        let cell = CellValue::Text("2024-01-15".to_string());
        let dt = cell.as_datetime().unwrap();
        assert_eq!(dt.format("%Y-%m").to_string(), "2024-01");

        let cell = CellValue::Text("15/01/2024".to_string());
        assert!(cell.as_datetime().is_some());

        let cell = CellValue::Text("not a date".to_string());
        assert!(cell.as_datetime().is_none());
    }

    #[test]
    fn test_display_string_renders_ids_consistently() {
        assert_eq!(CellValue::Number(42.0).to_display_string(), "42");
        assert_eq!(CellValue::Integer(42).to_display_string(), "42");
        assert_eq!(CellValue::Number(42.5).to_display_string(), "42.5");
    }

    #[test]
    fn test_from_row_omits_empty_cells() {
        let record = Record::from_row(
            &headers(&["a", "b", "c"]),
            &[
                CellValue::Text("x".to_string()),
                CellValue::Empty,
                CellValue::Integer(3),
            ],
        );

        assert_eq!(record.len(), 2);
        assert!(record.has_value("a"));
        assert!(!record.has_value("b"));
        assert!(record.has_value("c"));
    }

    #[test]
    fn test_from_row_skips_unnamed_columns() {
        let record = Record::from_row(
            &headers(&["", "name"]),
            &[
                CellValue::Text("orphan".to_string()),
                CellValue::Text("kept".to_string()),
            ],
        );

        assert_eq!(record.len(), 1);
        assert!(record.has_value("name"));
    }

    #[test]
    fn test_blank_record() {
        let record = Record::from_row(&headers(&["a"]), &[CellValue::Empty]);
        assert!(record.is_blank());
    }

    #[test]
    fn test_trim_text_fields() {
        let mut record = Record::new();
        record.set("name", CellValue::Text("  Health  ".to_string()));
        record.trim_text_fields();
        assert_eq!(
            record.get("name"),
            Some(&CellValue::Text("Health".to_string()))
        );
    }
}
