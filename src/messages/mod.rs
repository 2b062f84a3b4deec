//! Lint message model
//!
//! Represents linter output as opaque structured records keyed by
//! file/line/column. Two messages are considered the same violation when
//! their `(code, text)` pair matches; line and column are positional only,
//! so a line shift never manufactures a "new" message.

mod parser;

use serde::{Deserialize, Serialize};

pub use parser::from_linter_output;

/// Severity of a lint message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Lowercase label used by machine-readable reporters
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    /// Uppercase label used by the human reporter
    pub fn upper_label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

/// A single lint message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    /// The rule/sniff code that produced the message
    pub code: String,
    pub text: String,
}

impl LintMessage {
    /// True when the other message reports the same violation,
    /// regardless of position
    pub fn same_violation(&self, other: &LintMessage) -> bool {
        self.code == other.code && self.text == other.text
    }
}

/// An ordered collection of lint messages grouped by file
///
/// Insertion order is preserved per file; `files()` yields file names in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSet {
    messages: Vec<LintMessage>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<LintMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[LintMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// File names in first-seen order, without duplicates
    pub fn files(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for message in &self.messages {
            if !seen.contains(&message.file.as_str()) {
                seen.push(message.file.as_str());
            }
        }
        seen
    }

    /// Messages for one file, in insertion order
    pub fn for_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a LintMessage> {
        self.messages.iter().filter(move |m| m.file == file)
    }

    /// Counts of (errors, warnings) across all messages
    pub fn totals(&self) -> (usize, usize) {
        let errors = self
            .messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count();
        (errors, self.messages.len() - errors)
    }

    /// Merge several sets into one, concatenating per-file sequences and
    /// preserving first-seen file ordering across the inputs
    pub fn merge(sets: impl IntoIterator<Item = MessageSet>) -> MessageSet {
        let mut order: Vec<String> = Vec::new();
        let mut merged: Vec<LintMessage> = Vec::new();

        for set in sets {
            for message in set.messages {
                if !order.contains(&message.file) {
                    order.push(message.file.clone());
                }
                merged.push(message);
            }
        }

        // Regroup so each file's messages stay contiguous in first-seen order
        let mut grouped = Vec::with_capacity(merged.len());
        for file in &order {
            grouped.extend(merged.iter().filter(|m| &m.file == file).cloned());
        }
        MessageSet { messages: grouped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(file: &str, line: u32, code: &str) -> LintMessage {
        LintMessage {
            file: file.to_string(),
            line,
            column: 1,
            severity: Severity::Error,
            code: code.to_string(),
            text: format!("text for {code}"),
        }
    }

    #[test]
    fn test_same_violation_ignores_position() {
        let a = message("a.php", 10, "E1");
        let mut b = message("b.php", 99, "E1");
        b.column = 42;
        assert!(a.same_violation(&b));
    }

    #[test]
    fn test_same_violation_requires_code_and_text() {
        let a = message("a.php", 10, "E1");
        let b = message("a.php", 10, "E2");
        assert!(!a.same_violation(&b));

        let mut c = message("a.php", 10, "E1");
        c.text = "different".to_string();
        assert!(!a.same_violation(&c));
    }

    #[test]
    fn test_files_first_seen_order() {
        let set = MessageSet::from_messages(vec![
            message("b.php", 1, "E1"),
            message("a.php", 1, "E1"),
            message("b.php", 2, "E2"),
        ]);
        assert_eq!(set.files(), vec!["b.php", "a.php"]);
    }

    #[test]
    fn test_for_file_preserves_order() {
        let set = MessageSet::from_messages(vec![
            message("a.php", 5, "E2"),
            message("b.php", 1, "E1"),
            message("a.php", 2, "E1"),
        ]);
        let lines: Vec<u32> = set.for_file("a.php").map(|m| m.line).collect();
        assert_eq!(lines, vec![5, 2]);
    }

    #[test]
    fn test_merge_concatenates_per_file() {
        let first = MessageSet::from_messages(vec![
            message("a.php", 1, "E1"),
            message("b.php", 1, "E1"),
        ]);
        let second = MessageSet::from_messages(vec![
            message("a.php", 2, "E2"),
            message("c.php", 1, "E1"),
        ]);

        let merged = MessageSet::merge(vec![first, second]);
        assert_eq!(merged.files(), vec!["a.php", "b.php", "c.php"]);

        let a_lines: Vec<u32> = merged.for_file("a.php").map(|m| m.line).collect();
        assert_eq!(a_lines, vec![1, 2]);
        // Per-file groups are contiguous
        let files_in_order: Vec<&str> = merged.messages().iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files_in_order, vec!["a.php", "a.php", "b.php", "c.php"]);
    }

    #[test]
    fn test_merge_empty_sets() {
        let merged = MessageSet::merge(vec![MessageSet::new(), MessageSet::new()]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut warning = message("a.php", 3, "W1");
        warning.severity = Severity::Warning;
        let set = MessageSet::from_messages(vec![
            message("a.php", 1, "E1"),
            message("a.php", 2, "E2"),
            warning,
        ]);
        assert_eq!(set.totals(), (2, 1));
    }
}
