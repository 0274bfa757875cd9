#![cfg(not(tarpaulin_include))]

use absentee_report::downloader::REPORT_FILE_NAME;
use absentee_report::pipeline::generate_report_from_file;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        let program = args.first().map(String::as_str).unwrap_or("absentee-cli");
        eprintln!("Usage: {} <input.xlsx> [output.xlsx]", program);
        return ExitCode::from(2);
    }

    let input = PathBuf::from(&args[1]);
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));

    let report = match generate_report_from_file(&input, |stage| println!("{}", stage)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    println!("Found {} absentees.", report.absentee_count());

    if let Err(e) = std::fs::write(&output, &report.workbook) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        return ExitCode::FAILURE;
    }
    println!("Report written to {}", output.display());

    ExitCode::SUCCESS
}
