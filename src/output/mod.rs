//! Output module for presenting crawl results
//!
//! This module handles:
//! - Printing scraped records to the terminal
//! - Writing a markdown report of a crawl run

mod markdown;

pub use markdown::{format_markdown_report, generate_markdown_report};

use crate::crawler::SeoData;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Formats a record as a single tab-separated line
pub fn format_record(record: &SeoData) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.status_code,
        record.url,
        single_line(&record.title),
        single_line(&record.h1),
        single_line(&record.meta_description)
    )
}

/// Writes one line per record to `out`
pub fn write_records<W: Write>(records: &[SeoData], out: &mut W) -> OutputResult<()> {
    for record in records {
        writeln!(out, "{}", format_record(record))?;
    }
    Ok(())
}

/// Prints one line per record to stdout
pub fn print_records(records: &[SeoData]) -> OutputResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_records(records, &mut handle)
}

/// Collapses runs of whitespace, including newlines, into single spaces
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
