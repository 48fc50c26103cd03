//! Markdown report generation
//!
//! This module generates a human-readable markdown report with one section
//! per crawled listing.

use crate::output::{ListingReport, OutputError, OutputResult};
use chrono::Utc;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for `reports` to `output_path`
///
/// Missing parent directories are created.
pub fn write_markdown_report(reports: &[ListingReport], output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(reports);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path).map_err(|e| {
        OutputError::Write(format!("{}: {}", output_path.display(), e))
    })?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl reports as markdown
pub fn format_markdown_report(reports: &[ListingReport]) -> String {
    let mut md = String::new();

    md.push_str("# Listing-Pager Report\n\n");
    md.push_str(&format!("- **Generated**: {}\n", Utc::now().to_rfc3339()));
    md.push_str(&format!("- **Listings**: {}\n", reports.len()));
    md.push_str(&format!(
        "- **New Items**: {}\n",
        reports.iter().map(|r| r.new_items.len()).sum::<usize>()
    ));
    md.push_str(&format!(
        "- **Total Items**: {}\n\n",
        reports.iter().map(|r| r.result.items().len()).sum::<usize>()
    ));

    if reports.is_empty() {
        md.push_str("_No listings were crawled._\n");
        return md;
    }

    for report in reports {
        format_listing_section(&mut md, report);
    }

    md
}

fn format_listing_section(md: &mut String, report: &ListingReport) {
    let result = &report.result;

    md.push_str(&format!("## {}\n\n", report.name));
    md.push_str(&format!("- **Start URL**: {}\n", result.start_url()));
    md.push_str(&format!(
        "- **Terminated**: {}\n",
        result.terminated_reason()
    ));
    if let Some(error) = result.last_error() {
        md.push_str(&format!("- **Last Error**: {}\n", error));
    }
    md.push_str(&format!(
        "- **Pages Extracted**: {}\n",
        result.pages_extracted()
    ));
    md.push_str(&format!(
        "- **Pages Visited**: {}\n",
        result.pages_visited()
    ));
    md.push_str(&format!(
        "- **Items**: {} new / {} total\n\n",
        report.new_items.len(),
        result.items().len()
    ));

    if !result.warnings().is_empty() {
        md.push_str("### Warnings\n\n");
        for warning in result.warnings() {
            md.push_str(&format!("- {}\n", warning));
        }
        md.push('\n');
    }

    if result.items().is_empty() {
        md.push_str("_No items found._\n\n");
        return;
    }

    md.push_str("### Items\n\n");
    for item in result.items() {
        let marker = if report.is_new(item) { " **(new)**" } else { "" };
        md.push_str(&format!(
            "- [{}]({}){}\n",
            escape_link_text(&item.title),
            item.url,
            marker
        ));
    }
    md.push('\n');
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{
        CrawlResult, CrawlWarning, FailureKind, ListingItem, PaginationState, TerminationReason,
    };
    use tempfile::TempDir;

    fn create_test_result() -> CrawlResult {
        let mut result = CrawlResult::new("https://example.com/career");
        result.push_unique(ListingItem::new("Rust Engineer", "https://example.com/jobs/1"));
        result.push_unique(ListingItem::new("Designer [m/w/d]", "https://example.com/jobs/2"));
        result.record_extraction(PaginationState::with_next(1, 2, "?page=2"));
        result.record_transition();
        result.record_extraction(PaginationState::last(2, 2));
        result.finish(TerminationReason::NoNextPage, None)
    }

    #[test]
    fn test_format_markdown_report() {
        let result = create_test_result();
        let new_items = vec![result.items()[1].clone()];
        let report = ListingReport::new("Example GmbH", result, new_items);

        let markdown = format_markdown_report(&[report]);

        assert!(markdown.contains("# Listing-Pager Report"));
        assert!(markdown.contains("## Example GmbH"));
        assert!(markdown.contains("- **Start URL**: https://example.com/career"));
        assert!(markdown.contains("- **Terminated**: no_next_page"));
        assert!(markdown.contains("- **Pages Extracted**: 2"));
        assert!(markdown.contains("- **Pages Visited**: 1"));
        assert!(markdown.contains("- **Items**: 1 new / 2 total"));
        assert!(markdown.contains("- [Rust Engineer](https://example.com/jobs/1)\n"));
        assert!(markdown
            .contains("- [Designer \\[m/w/d\\]](https://example.com/jobs/2) **(new)**\n"));
    }

    #[test]
    fn test_failed_crawl_section() {
        let mut result = CrawlResult::new("https://example.com/career");
        result.warn(CrawlWarning::MalformedPagination {
            page_url: "https://example.com/career".to_string(),
        });
        let result = result.finish(
            TerminationReason::ExtractionFailed(FailureKind::Timeout),
            Some("timed out".to_string()),
        );

        let markdown = format_markdown_report(&[ListingReport::all_new("Slow AG", result)]);

        assert!(markdown.contains("- **Terminated**: extraction_timeout"));
        assert!(markdown.contains("- **Last Error**: timed out"));
        assert!(markdown.contains("### Warnings"));
        assert!(markdown.contains("_No items found._"));
    }

    #[test]
    fn test_empty_report() {
        let markdown = format_markdown_report(&[]);
        assert!(markdown.contains("- **Listings**: 0"));
        assert!(markdown.contains("_No listings were crawled._"));
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("summary.md");

        let report = ListingReport::all_new("Example GmbH", create_test_result());
        write_markdown_report(&[report], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Example GmbH"));
        assert!(content.contains("- **Items**: 2 new / 2 total"));
    }
}
