//! Human-readable console reporter

use crate::error::Result;
use crate::messages::{MessageSet, Severity};

use super::Reporter;

const RULE: &str =
    "----------------------------------------------------------------------";

pub struct HumanReporter;

impl Reporter for HumanReporter {
    fn format(&self, messages: &MessageSet) -> Result<String> {
        if messages.is_empty() {
            return Ok(String::new());
        }

        let mut out = String::new();
        for file in messages.files() {
            let file_messages: Vec<_> = messages.for_file(file).collect();
            let errors = file_messages
                .iter()
                .filter(|m| m.severity == Severity::Error)
                .count();
            let warnings = file_messages.len() - errors;

            out.push_str(&format!("FILE: {file}\n{RULE}\n"));
            out.push_str(&format!(
                "FOUND {} AND {} AFFECTING {}\n{RULE}\n",
                count(errors, "ERROR"),
                count(warnings, "WARNING"),
                count(affected_lines(&file_messages), "LINE"),
            ));

            let line_width = file_messages
                .iter()
                .map(|m| m.line.to_string().len())
                .max()
                .unwrap_or(1);
            for message in &file_messages {
                out.push_str(&format!(
                    " {:>line_width$} | {:<7} | {} ({})\n",
                    message.line,
                    message.severity.upper_label(),
                    message.text,
                    message.code,
                ));
            }
            out.push_str(&format!("{RULE}\n\n"));
        }

        let (errors, warnings) = messages.totals();
        out.push_str(&format!(
            "FOUND {} AND {} IN {}\n",
            count(errors, "ERROR"),
            count(warnings, "WARNING"),
            count(messages.files().len(), "FILE"),
        ));
        Ok(out)
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}S")
    }
}

fn affected_lines(messages: &[&crate::messages::LintMessage]) -> usize {
    let mut lines: Vec<u32> = messages.iter().map(|m| m.line).collect();
    lines.sort_unstable();
    lines.dedup();
    lines.len()
}
