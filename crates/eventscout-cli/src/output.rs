//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use eventscout_domain::AnalysisRecord;
use eventscout_extractor::RunSummary;
use eventscout_report::{ExportSummary, ReportExporter};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the processed-documents listing.
    pub fn format_records(&self, records: &[AnalysisRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(records),
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Quiet => Ok(self.format_records_quiet(records)),
        }
    }

    fn format_records_json(&self, records: &[AnalysisRecord]) -> Result<String> {
        let rows: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "pdf_file": r.document_name,
                    "processed_at": r.processed_at,
                    "num_events": r.event_count,
                    "no_events": r.is_no_events(),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&rows)?)
    }

    fn format_records_table(&self, records: &[AnalysisRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No documents processed yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Document", "Processed", "Entries", "Outcome"]);

        for record in records {
            let outcome = if record.is_no_events() {
                "no new events"
            } else if record.events.is_empty() {
                "nothing parsed"
            } else {
                "new events"
            };
            // Seconds are enough for a listing
            let processed = record.processed_at.get(..19).unwrap_or(record.processed_at.as_str());
            let entries = record.event_count.to_string();
            builder.push_record([record.document_name.as_str(), processed, entries.as_str(), outcome]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_records_quiet(&self, records: &[AnalysisRecord]) -> String {
        let names: Vec<&str> = records.iter().map(|r| r.document_name.as_str()).collect();
        names.join("\n")
    }

    /// Summarize a processing run.
    pub fn run_summary(&self, summary: &RunSummary) -> String {
        if summary.aborted {
            return self.error("Exiting without processing.");
        }

        let mut lines = vec![self.success(&format!(
            "Appended {} document(s), skipped {} already processed",
            summary.appended.len(),
            summary.skipped.len()
        ))];
        for failure in &summary.failed {
            lines.push(self.warning(&format!(
                "{} failed: {}",
                failure.document_name, failure.reason
            )));
        }
        lines.join("\n")
    }

    /// Summarize an export.
    pub fn export_summary(&self, summary: &ExportSummary, exporter: &ReportExporter) -> String {
        [
            self.success(&format!(
                "Generated CSVs: {} no-event entries, {} new-event rows.",
                summary.no_event_rows, summary.new_event_rows
            )),
            self.info(&exporter.no_events_path().display().to_string()),
            self.info(&exporter.new_events_path().display().to_string()),
        ]
        .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventscout_domain::{EventRecord, NoEventRecord};
    use eventscout_extractor::DocumentFailure;

    fn records() -> Vec<AnalysisRecord> {
        vec![
            AnalysisRecord::with_timestamp(
                "2025-11-02T09:00:00.123456",
                "AUTOSAR_SWS_Det.pdf",
                vec![NoEventRecord::new("covered").into()],
            ),
            AnalysisRecord::with_timestamp(
                "2025-11-02T09:05:00.654321",
                "AUTOSAR_SWS_Csm.pdf",
                vec![EventRecord::new("e", "l", "r").into()],
            ),
        ]
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&records()).unwrap();
        assert!(output.contains("Document"));
        assert!(output.contains("AUTOSAR_SWS_Csm.pdf"));
        assert!(output.contains("2025-11-02T09:00:00"));
        assert!(!output.contains(".123456"));
        assert!(output.contains("no new events"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_records(&records()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["pdf_file"], "AUTOSAR_SWS_Det.pdf");
        assert_eq!(parsed[0]["no_events"], true);
        assert_eq!(parsed[1]["num_events"], 1);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_records(&records()).unwrap();
        assert_eq!(output, "AUTOSAR_SWS_Det.pdf\nAUTOSAR_SWS_Csm.pdf");
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[]).unwrap();
        assert!(output.contains("No documents processed yet"));
    }

    #[test]
    fn test_run_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let summary = RunSummary {
            appended: vec!["a.pdf".into()],
            skipped: vec!["b.pdf".into(), "c.pdf".into()],
            failed: vec![DocumentFailure {
                document_name: "d.pdf".into(),
                reason: "no text layer".into(),
            }],
            aborted: false,
        };
        let output = formatter.run_summary(&summary);
        assert!(output.starts_with("✓ Appended 1 document(s), skipped 2"));
        assert!(output.contains("⚠ d.pdf failed: no text layer"));

        assert!(formatter.run_summary(&RunSummary::aborted()).starts_with("✗"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
