use crate::cell::CellValue;
use crate::error::ReportError;
use crate::table::SourceTable;
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

/// Zero-based sheet row holding the column names. The rows above it are
/// report titles and are ignored.
pub const HEADER_ROW: u32 = 2;

/// Load an attendance sheet from the bytes of an uploaded Excel file
///
/// The first worksheet is read. Cells are addressed from `A1`, so blank
/// leading rows and columns keep their positions. The third row supplies
/// the column names; blank header cells are named `Unnamed: <index>`.
/// Data rows where every cell is blank are skipped.
///
/// # Arguments
/// * `bytes` - Raw content of an `.xlsx` file
///
/// # Returns
/// * `Result<SourceTable, ReportError>` - The loaded table, or a parse error when the
///   bytes are not a workbook or the sheet is shorter than three rows
///
/// # Examples
/// ```
/// use absentee_report::loader::from_excel_bytes;
///
/// let err = from_excel_bytes(b"name,date\nAlice,2025-01-05").unwrap_err();
/// assert!(err.user_message().starts_with("Error processing file: "));
/// ```
pub fn from_excel_bytes(bytes: &[u8]) -> Result<SourceTable, ReportError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Parse("No sheets found in Excel file".to_string()))??;

    let table = table_from_range(&range)?;
    log::debug!(
        "loaded sheet with {} columns and {} data rows",
        table.width(),
        table.rows.len()
    );
    Ok(table)
}

/// Load an attendance sheet from an Excel file on disk
///
/// # Arguments
/// * `filepath` - Path to the `.xlsx` file to load
///
/// # Returns
/// * `Result<SourceTable, ReportError>` - The loaded table or a parse error
///
/// # Examples
/// ```no_run
/// use absentee_report::loader::from_excel;
///
/// match from_excel("attendance.xlsx") {
///     Ok(table) => println!("Loaded {} rows", table.rows.len()),
///     Err(e) => eprintln!("{}", e.user_message()),
/// }
/// ```
pub fn from_excel(filepath: impl AsRef<Path>) -> Result<SourceTable, ReportError> {
    let path = filepath.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ReportError::Parse(format!("{}: {}", path.display(), e)))?;
    from_excel_bytes(&bytes)
}

fn table_from_range(range: &Range<Data>) -> Result<SourceTable, ReportError> {
    let (last_row, last_col) = match range.end() {
        Some(end) if !range.is_empty() => end,
        _ => return Err(ReportError::Parse("Excel sheet is empty".to_string())),
    };

    if last_row < HEADER_ROW {
        return Err(ReportError::Parse(format!(
            "expected a header row at row {} but the sheet has only {} rows",
            HEADER_ROW + 1,
            last_row + 1
        )));
    }

    let cell = |row: u32, col: u32| {
        range
            .get_value((row, col))
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty)
    };

    let headers = (0..=last_col)
        .map(|col| header_name(&cell(HEADER_ROW, col), col))
        .collect();

    let rows = (HEADER_ROW + 1..=last_row)
        .map(|row| (0..=last_col).map(|col| cell(row, col)).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(SourceTable::new(headers, rows))
}

fn header_name(value: &CellValue, col: u32) -> String {
    match value {
        CellValue::Empty => format!("Unnamed: {}", col),
        other => other.to_text(),
    }
}
