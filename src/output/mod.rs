//! Report rendering
//!
//! Prints the crawl report to standard output as an aligned text table with a
//! summary, listing terminally failed rows explicitly.

use crate::crawler::CrawlReport;

/// Prints the full report: resolved records, failures, and a summary
pub fn print_report(report: &CrawlReport) {
    println!("{:<28} {:<28} {}", "EVENT", "TASK", "WRITEUP");
    println!("{}", "=".repeat(100));

    for record in &report.resolved {
        println!(
            "{:<28} {:<28} {}",
            truncate(&record.event, 25),
            truncate(&record.task, 25),
            record.url
        );
    }

    if !report.failed.is_empty() {
        println!();
        println!("Failed to resolve:");
        for failure in &report.failed {
            println!(
                "  {} - {} (gave up after {} attempts)",
                failure.event, failure.task, failure.attempts
            );
        }
    }

    println!();
    println!("Resolved: {}", report.resolved.len());
    println!("Failed:   {}", report.failed.len());
    println!("Total:    {}", report.total());
}

/// Truncates a label for column display, appending an ellipsis
fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        let cut: String = label.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_label_unchanged() {
        assert_eq!(truncate("pwn200", 25), "pwn200");
    }

    #[test]
    fn test_truncate_long_label() {
        let long = "a".repeat(40);
        let shown = truncate(&long, 25);
        assert_eq!(shown.len(), 28);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_truncate_is_char_aware() {
        let label = "é".repeat(30);
        let shown = truncate(&label, 25);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 28);
    }
}
