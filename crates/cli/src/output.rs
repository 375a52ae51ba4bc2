//! Text and JSON rendering for command results.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;

use tabula_compute::summary::ColumnKind;
use tabula_compute::{AnalysisReport, DatasetSummary};
use tabula_rules::Alert;

use crate::cli::OutputFormat;

/// Render any serializable result as pretty JSON, or use `text` otherwise.
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(text(value)),
    }
}

pub fn report_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let date = report.schema.date.as_deref().unwrap_or("none");
    let numeric = if report.schema.numeric.is_empty() {
        "none".to_string()
    } else {
        report.schema.numeric.join(", ")
    };
    let _ = writeln!(out, "numeric columns: {numeric}");
    let _ = writeln!(out, "date column:     {date}");
    let _ = writeln!(out);

    if report.insights.is_empty() {
        let _ = writeln!(out, "No insights found.");
        return out;
    }

    let _ = writeln!(out, "{} insight(s):", report.insights.len());
    for insight in &report.insights {
        let _ = writeln!(
            out,
            "  [{:>5.1}] {:<11} {}",
            insight.confidence,
            insight.insight_type.to_string(),
            insight.title
        );
        let _ = writeln!(out, "          {}", insight.description);
    }
    out
}

pub fn summary_text(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} row(s), {} column(s)", summary.rows, summary.columns.len());
    for col in &summary.columns {
        let kind = match col.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        };
        let _ = write!(
            out,
            "  {:<20} {:<8} valid={:<6} skipped={:<6}",
            col.name, kind, col.valid, col.skipped
        );
        if let Some(s) = &col.stats {
            let _ = write!(
                out,
                " min={:.2} max={:.2} mean={:.2} sd={:.2}",
                s.min, s.max, s.mean, s.std_dev
            );
        }
        let _ = writeln!(out);
    }
    out
}

pub fn alerts_text(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts fired.\n".to_string();
    }
    let mut out = String::new();
    for alert in alerts {
        let _ = writeln!(out, "ALERT {}: {}", alert.rule_id, alert.message);
        if !alert.matched_rows.is_empty() {
            let rows: Vec<String> = alert.matched_rows.iter().map(|r| r.to_string()).collect();
            let _ = writeln!(out, "      rows: {}", rows.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_compute::InsightEngine;
    use tabula_core::{Dataset, FieldValue, Record};

    fn growth() -> Dataset {
        (0..10)
            .map(|i| {
                let mut r = Record::new();
                r.insert("Date".into(), FieldValue::from(format!("2024-01-{:02}", i + 1)));
                r.insert("Revenue".into(), FieldValue::from((100 + 10 * i).to_string()));
                r
            })
            .collect()
    }

    #[test]
    fn report_text_lists_insights() {
        let report = InsightEngine::default().run(&growth());
        let text = report_text(&report);
        assert!(text.contains("numeric columns: Revenue"));
        assert!(text.contains("date column:     Date"));
        assert!(text.contains("Upward trend in Revenue"));
        assert!(text.contains("[ 95.0] trend"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = InsightEngine::default().run(&Dataset::default());
        assert!(report_text(&report).contains("No insights found."));
    }

    #[test]
    fn json_output_is_valid() {
        let report = InsightEngine::default().run(&growth());
        let json = render(&report, OutputFormat::Json, report_text).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["insights"][0]["type"], "trend");
        assert_eq!(value["schema"]["date"], "Date");
    }

    #[test]
    fn alerts_text_lists_rows() {
        let alerts = vec![Alert {
            rule_id: "high-returns".into(),
            rule_name: "High returns".into(),
            column: "Returns".into(),
            observed: 400.0,
            matched_rows: vec![17],
            message: "High returns: 1 row(s) of Returns > 100".into(),
        }];
        let text = alerts_text(&alerts);
        assert!(text.starts_with("ALERT high-returns: High returns"));
        assert!(text.contains("rows: 17"));
        assert_eq!(alerts_text(&[]), "No alerts fired.\n");
    }
}
