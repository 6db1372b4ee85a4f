//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a crawl run:
//! run metadata, a status code breakdown and a table of every record.

use crate::crawler::CrawlReport;
use crate::output::OutputResult;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of a crawl run
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `config_hash` - Hash of the configuration file, if the run used one
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(
    report: &CrawlReport,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(report, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl run as markdown
///
/// Records are sorted by URL so reports of the same site diff cleanly.
pub fn format_markdown_report(report: &CrawlReport, config_hash: Option<&str>) -> String {
    let mut md = String::new();

    md.push_str("# Sitemap SEO Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root Sitemap**: {}\n", report.root_url));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.elapsed.as_secs_f64()
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Discovered**: {}\n", report.discovered));
    md.push_str(&format!("- **Pages Scraped**: {}\n", report.records.len()));
    md.push_str(&format!("- **Pages Dropped**: {}\n\n", report.dropped()));

    // Status breakdown
    let mut by_status: BTreeMap<u16, usize> = BTreeMap::new();
    for record in &report.records {
        *by_status.entry(record.status_code).or_insert(0) += 1;
    }

    md.push_str("## Status Codes\n\n");
    if by_status.is_empty() {
        md.push_str("_No pages scraped._\n\n");
    } else {
        md.push_str("| Status | Count |\n");
        md.push_str("|--------|-------|\n");
        for (status, count) in &by_status {
            md.push_str(&format!("| {} | {} |\n", status, count));
        }
        md.push('\n');
    }

    // Pages
    if !report.records.is_empty() {
        let mut records: Vec<_> = report.records.iter().collect();
        records.sort_by(|a, b| a.url.cmp(&b.url));

        md.push_str("## Pages\n\n");
        md.push_str("| URL | Status | Title | H1 | Meta Description |\n");
        md.push_str("|-----|--------|-------|----|------------------|\n");
        for record in records {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                escape_cell(&record.url),
                record.status_code,
                escape_cell(&record.title),
                escape_cell(&record.h1),
                escape_cell(&record.meta_description)
            ));
        }
    }

    md
}

/// Makes text safe for a single markdown table cell
fn escape_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
