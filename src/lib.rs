/*!
# Absentee Report Generator

A small web application that turns an attendance export into an absentee list.

## Overview

Staff upload the `.xlsx` attendance sheet produced by the time-keeping system.
The application picks out every employee whose status reads `NOT IN`, leaves
out SAUDI and KOREA nationals, and hands back `absent_by_date.xlsx` with two
columns: `Date` and `Absent Name`.

## Pipeline

Each upload runs through the same fixed sequence of stages:

```text
 upload bytes
      │
      ▼
 ┌──────────┐  first worksheet, row 3 is the header
 │  loader  │  rows 1-2 are report titles and are skipped
 └──────────┘
      │ SourceTable
      ▼
 ┌──────────┐  normalize headers, bind columns B / I / N / AR,
 │ pipeline │  keep NOT IN rows, drop SAUDI / KOREA,
 └──────────┘  project (date, name)
      │ AbsenteeTable
      ▼
 ┌────────────┐
 │ downloader │  in-memory xlsx
 └────────────┘
```

Nothing is stored between uploads. Any failure aborts the run and is shown
as `Error processing file: <cause>`.

## Modules

- **cell**: cell values and the text coercion used by the filter
- **table**: source and report tables, header normalization
- **loader**: xlsx parsing
- **pipeline**: column binding, row filter, projection, stage reporting
- **downloader**: xlsx export
- **error**: the error type shared by all stages
- **app**: HTTP routes (`web` feature)

## Binaries

- `absentee-report [addr] [upload_limit_mib]` - web server (default `127.0.0.1:3000`)
- `absentee-cli <input.xlsx> [output.xlsx]` - one-shot conversion on the command line
*/

#[cfg(feature = "web")]
pub mod app;
pub mod cell;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod table;

pub use cell::CellValue;
pub use error::ReportError;
pub use pipeline::{Report, Stage, generate_report};
