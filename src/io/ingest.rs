//! Sample ingest and validation.
//!
//! This module turns user-supplied text into a clean list of finite values that
//! is safe to fit.
//!
//! Supported inputs:
//! - a value list: numbers separated by commas and/or whitespace
//! - a CSV file with a header row, reading a single column
//! - a fetched document that is either of the two (see [`parse_document`])
//!
//! Design goals:
//! - **Strict value lists** (one bad token rejects the list, exit code 2)
//! - **Row-level validation** for CSV (skip bad cells, but report what happened)
//! - **Deterministic behavior** (column choice never depends on anything but the file)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// A cell that could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the selected column's values plus what was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedValues {
    pub values: Vec<f64>,
    /// Column the values came from (`None` for a plain value list).
    pub column: Option<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse a comma and/or whitespace separated list of numbers.
pub fn parse_values(text: &str) -> Result<Vec<f64>, AppError> {
    let mut values = Vec::new();
    for (idx, token) in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        let value = token.parse::<f64>().map_err(|_| {
            AppError::new(
                2,
                format!("Invalid number '{token}' at position {}.", idx + 1),
            )
        })?;
        if !value.is_finite() {
            return Err(AppError::new(
                2,
                format!("Value '{token}' at position {} is not finite.", idx + 1),
            ));
        }
        values.push(value);
    }

    if values.is_empty() {
        return Err(AppError::new(2, "No values supplied."));
    }
    Ok(values)
}

/// Load one column of a CSV file.
///
/// `column` is matched case-insensitively against the headers; without it the
/// first column whose non-empty cells are all numeric is used.
pub fn load_csv_column(path: &Path, column: Option<&str>) -> Result<IngestedValues, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_csv_column(file, column)
}

/// Parse CSV text (header row + records) and extract one column.
pub fn parse_csv_text(text: &str, column: Option<&str>) -> Result<IngestedValues, AppError> {
    read_csv_column(text.as_bytes(), column)
}

/// Parse a fetched document: CSV when its first line has a non-numeric token,
/// otherwise a plain value list.
pub fn parse_document(text: &str, column: Option<&str>) -> Result<IngestedValues, AppError> {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let has_header = first_line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .any(|t| t.trim_start_matches('\u{feff}').parse::<f64>().is_err());

    if has_header || column.is_some() {
        return parse_csv_text(text, column);
    }

    let values = parse_values(text)?;
    Ok(IngestedValues {
        rows_read: values.len(),
        values,
        column: None,
        row_errors: Vec::new(),
    })
}

fn read_csv_column<R: Read>(source: R, column: Option<&str>) -> Result<IngestedValues, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(AppError::new(2, "CSV has no header row."));
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Records start on line 2 (line 1 is the header).
        let line = idx + 2;
        match result {
            Ok(r) => records.push((line, r)),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }
    let rows_read = records.len() + row_errors.len();

    let col_idx = match column {
        Some(name) => find_column(&headers, name)?,
        None => first_numeric_column(&headers, &records)?,
    };
    let column_name = normalize_header_name(&headers[col_idx]).to_string();

    let mut values = Vec::new();
    for (line, record) in &records {
        // Missing or empty cells are dropped silently, like a NaN.
        let Some(cell) = record.get(col_idx).filter(|c| !c.is_empty()) else {
            continue;
        };
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            Ok(_) => row_errors.push(RowError {
                line: *line,
                message: format!("Non-finite value '{cell}' in column `{column_name}`"),
            }),
            Err(_) => row_errors.push(RowError {
                line: *line,
                message: format!("Invalid number '{cell}' in column `{column_name}`"),
            }),
        }
    }
    row_errors.sort_by_key(|e| e.line);

    if values.is_empty() {
        return Err(AppError::new(
            2,
            format!("Column `{column_name}` has no numeric values."),
        ));
    }

    Ok(IngestedValues {
        values,
        column: Some(column_name),
        row_errors,
        rows_read,
    })
}

fn normalize_header_name(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. Strip it so the column can be found by name.
    name.trim().trim_start_matches('\u{feff}')
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, AppError> {
    let wanted = name.trim();
    headers
        .iter()
        .position(|h| normalize_header_name(h).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let available: Vec<&str> = headers.iter().map(normalize_header_name).collect();
            AppError::new(
                2,
                format!(
                    "Column `{wanted}` not found. Available columns: {}",
                    available.join(", ")
                ),
            )
        })
}

fn first_numeric_column(
    headers: &StringRecord,
    records: &[(usize, StringRecord)],
) -> Result<usize, AppError> {
    (0..headers.len())
        .find(|&idx| {
            let mut cells = records
                .iter()
                .filter_map(|(_, r)| r.get(idx))
                .filter(|c| !c.is_empty())
                .peekable();
            cells.peek().is_some() && cells.all(|c| c.parse::<f64>().is_ok())
        })
        .ok_or_else(|| AppError::new(2, "CSV has no all-numeric column; pass --column."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_lists_accept_commas_and_whitespace() {
        let v = parse_values("1, 2,3\n4\t5   6.5e1").unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0, 4.0, 5.0, 65.0]);
    }

    #[test]
    fn value_lists_reject_garbage() {
        let err = parse_values("1, two, 3").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("'two' at position 2"));
        assert!(parse_values(" , \n").is_err());
        assert!(parse_values("1 inf").is_err());
    }

    #[test]
    fn csv_defaults_to_first_numeric_column() {
        let text = "\u{feff}name,Height,weight\na,1.5,60\nb,,70\nc,2.5,x\n";
        let data = parse_csv_text(text, None).unwrap();
        assert_eq!(data.column.as_deref(), Some("Height"));
        assert_eq!(data.values, vec![1.5, 2.5]);
        assert_eq!(data.rows_read, 3);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn csv_named_column_reports_bad_cells() {
        let text = "name,Height,weight\na,1.5,60\nb,,70\nc,2.5,x\n";
        let data = parse_csv_text(text, Some("WEIGHT")).unwrap();
        assert_eq!(data.values, vec![60.0, 70.0]);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 4);

        let err = parse_csv_text(text, Some("age")).unwrap_err();
        assert!(err.to_string().contains("Available columns: name, Height, weight"));
    }

    #[test]
    fn csv_without_numbers_is_rejected() {
        assert!(parse_csv_text("a,b\nx,y\n", None).is_err());
        assert!(parse_csv_text("a\n\n", Some("a")).is_err());
    }

    #[test]
    fn documents_are_sniffed() {
        let plain = parse_document("1 2 3\n4", None).unwrap();
        assert_eq!(plain.values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(plain.column, None);

        let csv = parse_document("x,y\n1,10\n2,20\n", Some("y")).unwrap();
        assert_eq!(csv.values, vec![10.0, 20.0]);
    }
}
