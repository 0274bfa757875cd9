use crate::cell::{CellValue, datetime_to_excel_serial};
use crate::error::ReportError;
use crate::table::{AbsenteeTable, REPORT_HEADERS};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

/// File name offered for the downloaded report.
pub const REPORT_FILE_NAME: &str = "absent_by_date.xlsx";

/// Media type of an `.xlsx` document.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert the absentee report to XLSX format
///
/// Writes a single worksheet with a bold `Date` / `Absent Name` header row
/// followed by one row per absentee. Cell types are preserved: numbers and
/// booleans are written as such, date-times as date-formatted numbers and
/// blank cells are left blank. No index column is added and nothing touches
/// the filesystem.
///
/// # Arguments
/// * `table` - The projected report rows
///
/// # Returns
/// * `Result<Vec<u8>, ReportError>` - XLSX file content as bytes or a serialization error
///
/// # Examples
/// ```
/// use absentee_report::downloader::to_xlsx;
/// use absentee_report::table::AbsenteeTable;
///
/// let bytes = to_xlsx(&AbsenteeTable::default()).unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub fn to_xlsx(table: &AbsenteeTable) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, *header, &header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as RowNum;
        write_cell(&mut worksheet, r, 0, &row.date, &datetime_format)?;
        write_cell(&mut worksheet, r, 1, &row.name, &datetime_format)?;
    }

    worksheet.set_column_width(0, 20)?;
    worksheet.set_column_width(1, 30)?;

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;
    log::debug!("serialized report with {} rows ({} bytes)", table.len(), buffer.len());

    Ok(buffer)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    datetime_format: &Format,
) -> Result<(), ReportError> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        CellValue::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Number(f) if f.is_finite() => {
            worksheet.write_number(row, col, *f)?;
        }
        // Excel has no NaN or infinity
        CellValue::Number(_) => {}
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_number_with_format(
                row,
                col,
                datetime_to_excel_serial(dt),
                datetime_format,
            )?;
        }
    }
    Ok(())
}
