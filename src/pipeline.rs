use crate::cell::CellValue;
use crate::downloader;
use crate::error::ReportError;
use crate::loader;
use crate::table::{AbsenteeRow, AbsenteeTable, SourceTable};
use std::fmt;
use std::path::Path;

/// Status text, after trimming and uppercasing, that marks an absence.
pub const ABSENT_STATUS: &str = "NOT IN";

/// Uppercased nationalities that never appear in the report.
pub const EXCLUDED_NATIONALITIES: [&str; 2] = ["SAUDI", "KOREA"];

/// Steps of a report run, in the order they execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Load,
    NormalizeHeaders,
    ResolveColumns,
    FilterRows,
    Project,
    Serialize,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Load,
        Stage::NormalizeHeaders,
        Stage::ResolveColumns,
        Stage::FilterRows,
        Stage::Project,
        Stage::Serialize,
    ];

    /// Short ASCII identifier, safe for HTTP headers.
    pub fn key(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::NormalizeHeaders => "normalize",
            Stage::ResolveColumns => "resolve",
            Stage::FilterRows => "filter",
            Stage::Project => "project",
            Stage::Serialize => "serialize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Load => "Reading Excel file...",
            Stage::NormalizeHeaders => "Cleaning column names...",
            Stage::ResolveColumns => "Locating name, date, status and nationality columns...",
            Stage::FilterRows => "Filtering for 'NOT IN' status and excluding SAUDI/KOREA...",
            Stage::Project => "Preparing absentee list...",
            Stage::Serialize => "Writing Excel report...",
        };
        f.write_str(text)
    }
}

/// Zero-based column positions of the fields the report needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRoles {
    pub name: usize,
    pub date: usize,
    pub status: usize,
    pub nationality: usize,
}

/// Layout of the attendance export: name in B, date in I, status in N and
/// nationality in AR.
pub const ATTENDANCE_LAYOUT: ColumnRoles = ColumnRoles {
    name: 1,
    date: 8,
    status: 13,
    nationality: 43,
};

/// Column roles bound to a concrete table.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundColumns {
    pub roles: ColumnRoles,
    pub name_header: String,
    pub date_header: String,
    pub status_header: String,
    pub nationality_header: String,
}

impl ColumnRoles {
    /// Number of columns a sheet needs for every role to resolve.
    pub fn required_width(&self) -> usize {
        [self.name, self.date, self.status, self.nationality]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Bind the roles to `table` by position.
    ///
    /// Whatever column sits at each position is used; header names are only
    /// reported, never checked.
    pub fn resolve(&self, table: &SourceTable) -> Result<BoundColumns, ReportError> {
        let required = self.required_width();
        if table.width() < required {
            return Err(ReportError::ColumnResolution {
                required,
                found: table.width(),
            });
        }

        let header = |i: usize| table.headers[i].clone();
        Ok(BoundColumns {
            roles: *self,
            name_header: header(self.name),
            date_header: header(self.date),
            status_header: header(self.status),
            nationality_header: header(self.nationality),
        })
    }
}

/// Decide whether a row belongs in the report.
///
/// The status must read `NOT IN` once trimmed and uppercased, and the
/// uppercased nationality must not be one of [`EXCLUDED_NATIONALITIES`].
/// Nationality is not trimmed. Both cells go through [`CellValue::to_text`],
/// so a blank status never matches and a blank nationality is never excluded.
///
/// # Examples
/// ```
/// use absentee_report::CellValue;
/// use absentee_report::pipeline::is_absentee;
///
/// let status = CellValue::Text("Not In ".into());
/// assert!(is_absentee(&status, &CellValue::Text("Egypt".into())));
/// assert!(!is_absentee(&status, &CellValue::Text("saudi".into())));
/// assert!(!is_absentee(&CellValue::Text("IN".into()), &CellValue::Empty));
/// ```
pub fn is_absentee(status: &CellValue, nationality: &CellValue) -> bool {
    let status = status.to_text().trim().to_uppercase();
    let nationality = nationality.to_text().to_uppercase();
    status == ABSENT_STATUS && !EXCLUDED_NATIONALITIES.contains(&nationality.as_str())
}

/// Rows of `table` that pass [`is_absentee`], in their original order.
pub fn filter_rows<'a>(table: &'a SourceTable, roles: &ColumnRoles) -> Vec<&'a [CellValue]> {
    table
        .rows
        .iter()
        .filter(|row| is_absentee(&row[roles.status], &row[roles.nationality]))
        .map(|row| row.as_slice())
        .collect()
}

/// Keep only the date and name of each row.
pub fn project(rows: &[&[CellValue]], roles: &ColumnRoles) -> AbsenteeTable {
    AbsenteeTable {
        rows: rows
            .iter()
            .map(|row| AbsenteeRow {
                date: row[roles.date].clone(),
                name: row[roles.name].clone(),
            })
            .collect(),
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug)]
pub struct Report {
    pub table: AbsenteeTable,
    /// The `.xlsx` document to hand to the user.
    pub workbook: Vec<u8>,
}

impl Report {
    pub fn absentee_count(&self) -> usize {
        self.table.len()
    }
}

/// Run the whole report over an uploaded workbook.
///
/// `on_stage` is called with each [`Stage`] just before it runs, so shells
/// can narrate progress. The first failing stage aborts the run and nothing
/// is returned but the error.
///
/// # Arguments
/// * `bytes` - Raw content of the uploaded `.xlsx` file
/// * `on_stage` - Progress callback
///
/// # Returns
/// * `Result<Report, ReportError>` - The report, or the error of the failing stage
///
/// # Examples
/// ```no_run
/// use absentee_report::pipeline::generate_report;
///
/// let bytes = std::fs::read("attendance.xlsx").unwrap();
/// match generate_report(&bytes, |stage| println!("{}", stage)) {
///     Ok(report) => println!("Found {} absentees.", report.absentee_count()),
///     Err(e) => eprintln!("{}", e.user_message()),
/// }
/// ```
pub fn generate_report(
    bytes: &[u8],
    on_stage: impl FnMut(Stage),
) -> Result<Report, ReportError> {
    generate_report_with(bytes, &ATTENDANCE_LAYOUT, on_stage)
}

/// Same as [`generate_report`] with an explicit column layout.
pub fn generate_report_with(
    bytes: &[u8],
    roles: &ColumnRoles,
    on_stage: impl FnMut(Stage),
) -> Result<Report, ReportError> {
    run_stages(|| loader::from_excel_bytes(bytes), roles, on_stage)
}

/// Run the report over an `.xlsx` file on disk.
///
/// A file that cannot be read fails the load stage like unreadable bytes do.
pub fn generate_report_from_file(
    filepath: impl AsRef<Path>,
    on_stage: impl FnMut(Stage),
) -> Result<Report, ReportError> {
    run_stages(|| loader::from_excel(filepath), &ATTENDANCE_LAYOUT, on_stage)
}

fn run_stages(
    load: impl FnOnce() -> Result<SourceTable, ReportError>,
    roles: &ColumnRoles,
    mut on_stage: impl FnMut(Stage),
) -> Result<Report, ReportError> {
    let mut enter = |stage: Stage| {
        log::info!("{}", stage);
        on_stage(stage);
    };

    enter(Stage::Load);
    let mut source = load()?;

    enter(Stage::NormalizeHeaders);
    source.normalize_headers();

    enter(Stage::ResolveColumns);
    let bound = roles.resolve(&source)?;
    log::debug!(
        "bound name={:?} date={:?} status={:?} nationality={:?}",
        bound.name_header,
        bound.date_header,
        bound.status_header,
        bound.nationality_header
    );

    enter(Stage::FilterRows);
    let matching = filter_rows(&source, roles);
    let blank_nationalities = matching
        .iter()
        .filter(|row| row[roles.nationality].is_empty())
        .count();
    if blank_nationalities > 0 {
        log::warn!(
            "{} matching rows have a blank nationality and were kept",
            blank_nationalities
        );
    }

    enter(Stage::Project);
    let table = project(&matching, roles);

    enter(Stage::Serialize);
    let workbook = downloader::to_xlsx(&table)?;

    log::info!(
        "found {} absentees in {} rows",
        table.len(),
        source.rows.len()
    );
    Ok(Report { table, workbook })
}
