/*!
 * Reporting functionality for DirPack
 *
 * Renders the end-of-run summary with the tabled library for clean,
 * consistent table output.
 */

use std::collections::HashMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::packer::FileDetail;

/// Statistics for a completed packing run
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to pack
    pub duration: Duration,
    /// Number of files packed
    pub total_files: usize,
    /// UTF-8 byte size of the output document
    pub total_size: usize,
    /// Approximate token count of the output document
    pub total_tokens: usize,
    /// Details for each packed file, keyed by relative path
    pub file_details: HashMap<String, FileDetail>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    // Other formats could be added in the future
}

/// Report generator for pack results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on pack statistics
    pub fn generate_report(&self, report: &PackReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &PackReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Truncate a relative path from the left, keeping the filename end
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }
        // The cut may land inside a multibyte character; move it forward
        // to the next char boundary before slicing.
        let mut cut = path.len().saturating_sub(max_len - 3);
        while !path.is_char_boundary(cut) {
            cut += 1;
        }
        format!("...{}", &path[cut..])
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &PackReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Packed".to_string(),
                value: self.format_number(report.total_files),
            },
            SummaryRow {
                key: "💾 Output Size".to_string(),
                value: format!("{:.2} KB", report.total_size as f64 / 1024.0),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!("{} tokens (approximate)", self.format_number(report.total_tokens)),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &PackReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Tokens")]
            tokens: String,
        }

        // Sort files by token count, heaviest first
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.tokens.cmp(&a.tokens));

        // Show all files for small runs, otherwise just the top 10
        let files_to_show = if report.file_details.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.tokens),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &PackReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  PACKING COMPLETE";
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY TOKEN COUNT"
        } else {
            "📋  PACKED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
