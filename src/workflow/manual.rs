//! Manual workflow: diff and both linter outputs supplied as files

use std::path::Path;

use crate::diff::parse_unified_diff;
use crate::error::{LintGuardError, Result};
use crate::filter;
use crate::messages::{from_linter_output, MessageSet};

pub fn run(diff: &Path, previous_lint: &Path, new_lint: &Path) -> Result<MessageSet> {
    let diff_text = read_input(diff)?;
    let previous_text = read_input(previous_lint)?;
    let new_text = read_input(new_lint)?;

    let parsed = parse_unified_diff(&diff_text)?;
    // Linter output produced from stdin often carries a placeholder path;
    // normalize both sides to the path the diff names
    let file_name = parsed.file_name().map(str::to_string);

    let old_messages = from_linter_output(&previous_text, file_name.as_deref())?;
    let new_messages = from_linter_output(&new_text, file_name.as_deref())?;
    Ok(filter::new_messages(&parsed, &old_messages, &new_messages))
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| LintGuardError::FileNotReadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const DIFF: &str = "\
--- src/widget.php
+++ src/widget.php
@@ -2,0 +3 @@
+$added = 1;
";

    fn lint_json(messages: &str) -> String {
        format!(
            r#"{{"files":{{"STDIN":{{"messages":[{messages}]}}}}}}"#
        )
    }

    #[test]
    fn test_manual_run_reports_only_new_messages() {
        let dir = TempDir::new().unwrap();
        let diff = write_file(&dir, "changes.diff", DIFF);
        let old = write_file(&dir, "old.json", &lint_json(""));
        let new = write_file(
            &dir,
            "new.json",
            &lint_json(
                r#"{"line":3,"column":1,"type":"ERROR","source":"Std.Rule","message":"bad"}"#,
            ),
        );

        let set = run(&diff, &old, &new).unwrap();
        assert_eq!(set.len(), 1);
        // The placeholder path from stdin linting is replaced by the diff's
        assert_eq!(set.messages()[0].file, "src/widget.php");
        assert_eq!(set.messages()[0].line, 3);
    }

    #[test]
    fn test_manual_run_empty_diff_reports_nothing() {
        let dir = TempDir::new().unwrap();
        let diff = write_file(&dir, "changes.diff", "");
        let lint = lint_json(
            r#"{"line":3,"column":1,"type":"ERROR","source":"Std.Rule","message":"bad"}"#,
        );
        let old = write_file(&dir, "old.json", &lint);
        let new = write_file(&dir, "new.json", &lint);

        let set = run(&diff, &old, &new).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_manual_run_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let diff = write_file(&dir, "changes.diff", DIFF);
        let old = write_file(&dir, "old.json", &lint_json(""));

        let err = run(&diff, &old, &dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LintGuardError::FileNotReadable { .. }));
    }

    #[test]
    fn test_manual_run_malformed_diff() {
        let dir = TempDir::new().unwrap();
        let diff = write_file(&dir, "changes.diff", "--- a\n+++ b\n@@ garbage @@\n");
        let old = write_file(&dir, "old.json", &lint_json(""));
        let new = write_file(&dir, "new.json", &lint_json(""));

        let err = run(&diff, &old, &new).unwrap_err();
        assert!(matches!(err, LintGuardError::MalformedDiff(_)));
    }
}
