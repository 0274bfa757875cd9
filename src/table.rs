use crate::cell::CellValue;

/// Column names of the generated report, in order.
pub const REPORT_HEADERS: [&str; 2] = ["Date", "Absent Name"];

/// Rows read from the uploaded sheet below its header row.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// [`CellValue::Empty`] when the table is built.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        SourceTable { headers, rows }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Apply [`normalize_header`] to every column name.
    pub fn normalize_headers(&mut self) {
        for header in self.headers.iter_mut() {
            *header = normalize_header(header);
        }
    }
}

/// Normalize a column header for lookup.
///
/// Line breaks become spaces, surrounding whitespace is trimmed and the
/// result is lowercased. Applying it twice gives the same string.
///
/// # Examples
/// ```
/// use absentee_report::table::normalize_header;
///
/// assert_eq!(normalize_header("  Employee\nName "), "employee name");
/// assert_eq!(normalize_header("employee name"), "employee name");
/// ```
pub fn normalize_header(header: &str) -> String {
    header.replace('\n', " ").trim().to_lowercase()
}

/// One line of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct AbsenteeRow {
    pub date: CellValue,
    pub name: CellValue,
}

/// The projected report: a date and a name for every matching row, in the
/// order the rows appeared in the upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbsenteeTable {
    pub rows: Vec<AbsenteeRow>,
}

impl AbsenteeTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
