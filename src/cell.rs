use calamine::Data;
use chrono::NaiveDateTime;

/// Days between the Excel serial-date epoch (1899-12-30) and the Unix epoch.
const EXCEL_UNIX_EPOCH_DAYS: f64 = 25_569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A single cell value read from an uploaded sheet.
///
/// Values keep their spreadsheet type so they can be written back unchanged
/// into the report. Comparisons go through [`CellValue::to_text`].
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Blank cell, or a cell holding a spreadsheet error such as `#N/A`
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns true for blank cells.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Coerce the cell to the text used by the row filter.
    ///
    /// The rules are:
    /// * blank cells become the empty string
    /// * text is returned as is (no trimming, no case change)
    /// * integers are printed in decimal
    /// * whole finite numbers keep a trailing `.0` (`3.0`), others use the shortest form
    /// * booleans become `True` / `False`
    /// * date-times become `YYYY-MM-DD HH:MM:SS`
    ///
    /// # Examples
    /// ```
    /// use absentee_report::CellValue;
    ///
    /// assert_eq!(CellValue::Empty.to_text(), "");
    /// assert_eq!(CellValue::Number(3.0).to_text(), "3.0");
    /// assert_eq!(CellValue::Text("Not In ".into()).to_text(), "Not In ");
    /// ```
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Number(f) => format_number(*f),
            CellValue::Boolean(true) => "True".to_string(),
            CellValue::Boolean(false) => "False".to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            // Error cells carry no usable value
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Integer(*i),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            // as_datetime follows the workbook's 1900 or 1904 date system
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Convert a date-time to an Excel serial date in the 1900 date system,
/// the one used by the generated report.
pub fn datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY + EXCEL_UNIX_EPOCH_DAYS
}
