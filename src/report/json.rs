//! JSON reporter matching the shape of the linters' own output

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{LintGuardError, Result};
use crate::messages::{LintMessage, MessageSet, Severity};

use super::Reporter;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn format(&self, messages: &MessageSet) -> Result<String> {
        let mut files = BTreeMap::new();
        for file in messages.files() {
            let file_messages: Vec<_> = messages.for_file(file).collect();
            let errors = file_messages
                .iter()
                .filter(|m| m.severity == Severity::Error)
                .count();
            files.insert(
                file,
                FileOut {
                    errors,
                    warnings: file_messages.len() - errors,
                    messages: file_messages.iter().map(|m| MessageOut::from(*m)).collect(),
                },
            );
        }

        let (errors, warnings) = messages.totals();
        let report = ReportOut {
            totals: Totals { errors, warnings },
            files,
        };
        let mut out = serde_json::to_string_pretty(&report)
            .map_err(|e| LintGuardError::Other(format!("json report: {e}")))?;
        out.push('\n');
        Ok(out)
    }
}

#[derive(Serialize)]
struct ReportOut<'a> {
    totals: Totals,
    files: BTreeMap<&'a str, FileOut<'a>>,
}

#[derive(Serialize)]
struct Totals {
    errors: usize,
    warnings: usize,
}

#[derive(Serialize)]
struct FileOut<'a> {
    errors: usize,
    warnings: usize,
    messages: Vec<MessageOut<'a>>,
}

#[derive(Serialize)]
struct MessageOut<'a> {
    line: u32,
    column: u32,
    #[serde(rename = "type")]
    severity: Severity,
    source: &'a str,
    message: &'a str,
}

impl<'a> From<&'a LintMessage> for MessageOut<'a> {
    fn from(message: &'a LintMessage) -> Self {
        Self {
            line: message.line,
            column: message.column,
            severity: message.severity,
            source: &message.code,
            message: &message.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::sample_set;
    use super::*;
    use crate::messages::from_linter_output;
    use crate::messages::MessageSet;

    #[test]
    fn test_json_report_totals_and_files() {
        let out = JsonReporter.format(&sample_set()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totals"]["errors"], 2);
        assert_eq!(value["totals"]["warnings"], 1);
        assert_eq!(value["files"]["src/widget.php"]["errors"], 1);
        assert_eq!(
            value["files"]["src/widget.php"]["messages"][0]["type"],
            "ERROR"
        );
        assert_eq!(
            value["files"]["src/widget.php"]["messages"][0]["source"],
            "Squiz.Commenting.FunctionComment.Missing"
        );
    }

    #[test]
    fn test_json_report_empty_set() {
        let out = JsonReporter.format(&MessageSet::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totals"]["errors"], 0);
        assert_eq!(value["files"], serde_json::json!({}));
    }

    #[test]
    fn test_json_report_round_trips_through_message_parser() {
        // The report uses the same wire shape the message parser accepts
        let out = JsonReporter.format(&sample_set()).unwrap();
        let parsed = from_linter_output(&out, None).unwrap();
        assert_eq!(parsed.len(), sample_set().len());
    }
}
