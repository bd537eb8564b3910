// ============================================================
// SPREADSHEET READER
// ============================================================
// Decode raw upload bytes into header-row + data-row tables

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::{ReaderBuilder, Trim};

use crate::domain::error::AppError;
use crate::domain::record::{CellValue, RawTable};

/// Tables extracted from one upload, plus shape warnings
/// (e.g. header-only sheets that were dropped)
#[derive(Debug)]
pub struct WorkbookTables {
    pub tables: Vec<RawTable>,
    pub warnings: Vec<String>,
}

/// Reader for uploaded spreadsheet byte buffers
///
/// Decodes xlsx/xls via calamine in header-row mode (first row =
/// headers, captured verbatim even when malformed) and csv via the csv
/// crate with lossy UTF-8 fallback. An undecodable buffer fails the
/// whole file with a single error; there are no partial sheet results.
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    /// Extract one table per non-empty sheet
    pub fn read_tables(&self, file_name: &str, bytes: &[u8]) -> Result<WorkbookTables, AppError> {
        if file_name.to_lowercase().ends_with(".csv") {
            self.read_csv(bytes)
        } else {
            self.read_workbook(bytes)
        }
    }

    fn read_workbook(&self, bytes: &[u8]) -> Result<WorkbookTables, AppError> {
        let cursor = Cursor::new(bytes);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| AppError::ParseError(format!("Failed to open spreadsheet: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_owned();
        if sheet_names.is_empty() {
            return Err(AppError::ParseError(
                "No sheets found in the file".to_string(),
            ));
        }

        let mut tables = Vec::new();
        let mut warnings = Vec::new();

        for (index, sheet_name) in sheet_names.iter().enumerate() {
            let range = match workbook.worksheet_range_at(index) {
                Some(Ok(range)) => range,
                Some(Err(e)) => {
                    return Err(AppError::ParseError(format!(
                        "Failed to read sheet {}: {}",
                        sheet_name, e
                    )));
                }
                None => continue,
            };

            let mut rows = range.rows();
            let headers: Vec<String> = match rows.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| convert_cell(cell).to_display_string())
                    .collect(),
                None => {
                    warnings.push(format!("Sheet {} has no data rows", sheet_name));
                    continue;
                }
            };

            let data_rows: Vec<Vec<CellValue>> = rows
                .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
                .filter(|row: &Vec<CellValue>| row.iter().any(|cell| !cell.is_empty()))
                .collect();

            if data_rows.is_empty() {
                warnings.push(format!("Sheet {} has no data rows", sheet_name));
                continue;
            }

            tables.push(RawTable {
                sheet_name: sheet_name.clone(),
                headers,
                rows: data_rows,
            });
        }

        Ok(WorkbookTables { tables, warnings })
    }

    fn read_csv(&self, bytes: &[u8]) -> Result<WorkbookTables, AppError> {
        // Lossy UTF-8 so legacy exports with stray bytes still decode
        let (content, _, _) = encoding_rs::UTF_8.decode(bytes);

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut data_rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            let row: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();

            if row.iter().any(|cell| !cell.is_empty()) {
                data_rows.push(row);
            }
        }

        let mut warnings = Vec::new();
        let mut tables = Vec::new();
        if data_rows.is_empty() {
            warnings.push("Sheet csv has no data rows".to_string());
        } else {
            tables.push(RawTable {
                sheet_name: "csv".to_string(),
                headers,
                rows: data_rows,
            });
        }

        Ok(WorkbookTables { tables, warnings })
    }
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => CellValue::Text(s.clone())
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_tables() {
        let content = b"applicationId,applicantName\n101,Asha\n102,Ravi";
        let reader = SpreadsheetReader::new();
        let outcome = reader.read_tables("applicationdetails.csv", content).unwrap();

        assert_eq!(outcome.tables.len(), 1);
        let table = &outcome.tables[0];
        assert_eq!(table.headers, vec!["applicationId", "applicantName"]);
        assert_eq!(table.record_count(), 2);
    }

    #[test]
    fn test_blank_rows_are_filtered() {
        let content = b"a,b\n1,2\n,\n3,4";
        let reader = SpreadsheetReader::new();
        let outcome = reader.read_tables("data.csv", content).unwrap();

        assert_eq!(outcome.tables[0].record_count(), 2);
    }

    #[test]
    fn test_header_only_csv_yields_warning() {
        let content = b"a,b";
        let reader = SpreadsheetReader::new();
        let outcome = reader.read_tables("data.csv", content).unwrap();

        assert!(outcome.tables.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_corrupt_workbook_fails_whole_file() {
        let reader = SpreadsheetReader::new();
        let result = reader.read_tables("broken.xlsx", b"this is not a workbook");

        assert!(result.is_err());
    }
}
