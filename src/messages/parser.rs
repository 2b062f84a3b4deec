//! Parsing of linter JSON reports into a [`MessageSet`]

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{LintGuardError, Result};

use super::{LintMessage, MessageSet, Severity};

/// Wire format of a linter JSON report (the phpcs `--report=json` shape):
/// `{"files": {path: {"messages": [{line, column, type, source, message}]}}}`
#[derive(Deserialize)]
struct LinterReport {
    files: BTreeMap<String, FileReport>,
}

#[derive(Deserialize)]
struct FileReport {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    line: u32,
    #[serde(default)]
    column: u32,
    #[serde(rename = "type")]
    severity: Severity,
    source: String,
    message: String,
}

/// Parse raw linter output into a [`MessageSet`]
///
/// An empty (or whitespace-only) input is zero messages, not an error: the
/// no-changes short-circuit path supplies empty output deliberately. When
/// `file_name_override` is given it replaces the report's own file keys,
/// which linters set to things like `STDIN` when fed over a pipe.
///
/// # Errors
/// Returns [`LintGuardError::MalformedOutput`] when the input is not a
/// report of the expected structure.
pub fn from_linter_output(output: &str, file_name_override: Option<&str>) -> Result<MessageSet> {
    if output.trim().is_empty() {
        return Ok(MessageSet::new());
    }

    let report: LinterReport = serde_json::from_str(output)
        .map_err(|e| LintGuardError::MalformedOutput(e.to_string()))?;

    let mut messages = Vec::new();
    for (file, file_report) in report.files {
        let name = file_name_override.unwrap_or(&file);
        for raw in file_report.messages {
            messages.push(LintMessage {
                file: name.to_string(),
                line: raw.line,
                column: raw.column,
                severity: raw.severity,
                code: raw.source,
                text: raw.message,
            });
        }
    }
    Ok(MessageSet::from_messages(messages))
}
