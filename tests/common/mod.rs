#![allow(dead_code)]

use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const NAME_COL: u16 = 1;
pub const DATE_COL: u16 = 8;
pub const STATUS_COL: u16 = 13;
pub const NATIONALITY_COL: u16 = 43;

/// A data row of the attendance export. `None` leaves the cell blank.
#[derive(Clone, Debug)]
pub struct Attendance {
    pub name: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub nationality: Option<String>,
}

pub fn row(name: &str, date: &str, status: &str, nationality: &str) -> Attendance {
    Attendance {
        name: Some(name.to_string()),
        date: Some(date.to_string()),
        status: Some(status.to_string()),
        nationality: Some(nationality.to_string()),
    }
}

/// Header row as the time-keeping system exports it, `width` columns wide.
pub fn headers(width: u16) -> Vec<String> {
    (0..width)
        .map(|col| match col {
            0 => "ID".to_string(),
            NAME_COL => "Employee\nName".to_string(),
            DATE_COL => " Date ".to_string(),
            STATUS_COL => "Status".to_string(),
            NATIONALITY_COL => "Nationality".to_string(),
            other => format!("Field {}", other),
        })
        .collect()
}

/// Write the two title rows and the header row.
pub fn write_preamble(worksheet: &mut Worksheet, width: u16) {
    worksheet.write_string(0, 0, "Daily Attendance Report").unwrap();
    worksheet.write_string(1, 0, "Generated by TimeClock").unwrap();
    for (col, header) in headers(width).iter().enumerate() {
        worksheet.write_string(2, col as u16, header.as_str()).unwrap();
    }
}

fn write_optional(worksheet: &mut Worksheet, row: u32, col: u16, value: &Option<String>) {
    if let Some(value) = value {
        worksheet.write_string(row, col, value.as_str()).unwrap();
    }
}

/// Build a 44-column attendance workbook holding `rows`.
pub fn attendance_workbook(rows: &[Attendance]) -> Vec<u8> {
    workbook_with_width(rows, 44)
}

/// Build an attendance workbook `width` columns wide; role cells beyond
/// the width are dropped.
pub fn workbook_with_width(rows: &[Attendance], width: u16) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    write_preamble(&mut worksheet, width);

    for (i, attendance) in rows.iter().enumerate() {
        let r = 3 + i as u32;
        worksheet.write_number(r, 0, (i + 1) as f64).unwrap();
        for (col, value) in [
            (NAME_COL, &attendance.name),
            (DATE_COL, &attendance.date),
            (STATUS_COL, &attendance.status),
            (NATIONALITY_COL, &attendance.nationality),
        ] {
            if col < width {
                write_optional(&mut worksheet, r, col, value);
            }
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().unwrap()
}

/// Build a workbook whose date column holds real Excel dates.
pub fn workbook_with_serial_dates(rows: &[(&str, f64, &str, &str)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    write_preamble(&mut worksheet, 44);

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (i, (name, serial, status, nationality)) in rows.iter().enumerate() {
        let r = 3 + i as u32;
        worksheet.write_string(r, NAME_COL, *name).unwrap();
        worksheet
            .write_number_with_format(r, DATE_COL, *serial, &date_format)
            .unwrap();
        worksheet.write_string(r, STATUS_COL, *status).unwrap();
        worksheet.write_string(r, NATIONALITY_COL, *nationality).unwrap();
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().unwrap()
}

/// Switch a workbook to the 1904 date system by flagging `xl/workbook.xml`.
/// Stored serials are left untouched, so every date shifts by 1462 days.
pub fn into_1904_date_system(bytes: &[u8]) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut flagged = false;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let name = file.name().to_string();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();

        if name == "xl/workbook.xml" {
            let xml = String::from_utf8(content).unwrap();
            assert!(xml.contains("<workbookPr"), "workbook.xml has no workbookPr");
            content = xml
                .replacen("<workbookPr", "<workbookPr date1904=\"1\"", 1)
                .into_bytes();
            flagged = true;
        }

        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(&content).unwrap();
    }

    assert!(flagged, "no xl/workbook.xml in fixture");
    writer.finish().unwrap().into_inner()
}

/// Read the first worksheet of a generated report.
pub fn read_report(bytes: &[u8]) -> Range<Data> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(workbook.sheet_names().len(), 1, "report has a single sheet");
    workbook.worksheet_range_at(0).unwrap().unwrap()
}

/// Report rows as text pairs, header row included.
pub fn report_strings(bytes: &[u8]) -> Vec<(String, String)> {
    read_report(bytes)
        .rows()
        .map(|r| (cell_text(r.first()), cell_text(r.get(1))))
        .collect()
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
