// Console reports for the three run modes

use crate::crawl::extract_url_path;
use crate::matrix::AdjacencyMatrix;
use colored::Colorize;
use linklister_scanner::{KeywordHit, PageLinkMap};
use serde_json::{Map, Value};

/// Summary of a matrix crawl
pub fn generate_crawl_report(pages: &PageLinkMap, matrix: &AdjacencyMatrix) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages crawled: {}\n", pages.len()));
    report.push_str(&format!("  Pages failed: {}\n", pages.failed().count()));
    report.push_str(&format!("  Total links found: {}\n", pages.total_links()));
    report.push_str(&format!("  Matrix size: {0} x {0}\n", matrix.len()));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for page in pages.pages() {
        let path = extract_url_path(&page.url);

        let status_str = match page.status_code {
            200..=299 => page.status_code.to_string().green(),
            300..=399 => page.status_code.to_string().cyan(),
            400..=499 => page.status_code.to_string().yellow(),
            500..=599 => page.status_code.to_string().red(),
            _ => "ERR".red(),
        };

        let mut line = format!("  {} {} ({} links)", status_str, path, page.links.len());
        if let Some(ref error) = page.error {
            line.push_str(&format!(" {}", error.bright_black()));
        }

        report.push_str(&line);
        report.push('\n');
    }

    report
}

/// Keyword hits as a pretty JSON object of URL to match count
pub fn format_keyword_hits(hits: &[KeywordHit]) -> Result<String, serde_json::Error> {
    let mapping: Map<String, Value> = hits
        .iter()
        .map(|hit| (hit.url.clone(), Value::from(hit.count)))
        .collect();

    serde_json::to_string_pretty(&mapping)
}

/// Listing entries as a pretty JSON array
pub fn format_listing(entries: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
