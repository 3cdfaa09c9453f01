use super::*;
use crate::output::export::ReportExport;
use anyhow::Result;
use std::fs;
use tracing::info;

pub struct Reporter {
    format: OutputFormat,
    output_path: String,
}

impl Reporter {
    pub fn new(format: &str, output_path: &str) -> Result<Self> {
        let format = OutputFormat::from(format);
        let output_path = super::add_file_extension(output_path, &format);

        Ok(Self {
            format,
            output_path,
        })
    }

    pub fn write_report(&self, export: &ReportExport) -> Result<()> {
        let content = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(export)?,
            OutputFormat::Text => console::format_text_report(export),
        };

        fs::write(&self.output_path, content)?;
        info!("Report saved to {}", self.output_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::engine::{to_repository_result, AggregateTally, AuthorCounts, BatchReport};
    use crate::output::export::build_export;
    use chrono::Utc;

    #[test]
    fn writes_json_report_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("report").display().to_string();

        let results = vec![to_repository_result(
            "api",
            "api",
            AuthorCounts::from([("Jane Doe".to_string(), 3)]),
        )];
        let tally = AggregateTally::fold_all(results.iter());
        let report = BatchReport {
            successful: results,
            failed: vec![],
            tally,
            generated_at: Utc::now(),
        };
        let export = build_export(&report, &Classifier::new().unwrap(), 20, 10);

        let reporter = Reporter::new("json", &base).unwrap();
        reporter.write_report(&export).unwrap();

        let written = std::fs::read_to_string(format!("{base}.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["summary"]["total_commits"], 3);
        assert_eq!(
            parsed["summary"]["overall_top_contributor"]["name"],
            "Jane Doe"
        );
    }
}
