//! Git workflows: staged, unstaged, and merge-base comparisons
//!
//! Old versions are read from the object database (`git show`) and fed to
//! the linter over stdin, so nothing is checked out. Cache identities are
//! blob ids where git tracks the content and a content hash for the
//! working copy.

use std::path::Path;

use crate::cache::CacheSide;
use crate::config::{Config, WorkflowMode};
use crate::diff::{parse_unified_diff, ParsedDiff};
use crate::error::{LintGuardError, Result};
use crate::filter;
use crate::messages::{from_linter_output, MessageSet};
use crate::shell::Shell;

use super::LintRunner;

/// Resolve the merge base of `object` and HEAD
pub(super) fn merge_base(config: &Config, shell: &dyn Shell, object: &str) -> Result<String> {
    let output = shell.execute(
        &config.git,
        &["merge-base".to_string(), object.to_string(), "HEAD".to_string()],
        None,
    )?;
    if !output.success() || output.stdout.trim().is_empty() {
        return Err(LintGuardError::Git(format!(
            "cannot find merge base of '{object}' and HEAD"
        )));
    }
    Ok(output.stdout.trim().to_string())
}

pub(super) fn run_for_file(
    mode: &WorkflowMode,
    file: &str,
    config: &Config,
    runner: &LintRunner<'_>,
) -> Result<MessageSet> {
    let shell = runner.shell;
    if !shell.is_readable(Path::new(file)) {
        return Err(LintGuardError::FileNotReadable {
            path: file.to_string(),
            reason: "cannot open for reading".to_string(),
        });
    }

    let diff_text = unified_diff(mode, file, config, shell)?;
    let file_diff = match parse_unified_diff(&diff_text)? {
        ParsedDiff::NoChanges => {
            (runner.debug)(&format!("no changes in '{file}', skipping lint"));
            return Ok(MessageSet::new());
        }
        ParsedDiff::Changes(file_diff) => file_diff,
    };

    let old_output = if file_diff.is_new_file {
        (runner.debug)(&format!("'{file}' is new, not linting the old version"));
        String::new()
    } else {
        let old_ref = old_ref(mode);
        let spec = format!("{old_ref}:{file}");
        let identity = rev_parse_blob(config, shell, &spec)?;
        let content = show(config, shell, &spec)?;
        runner.lint_cached(file, CacheSide::Old, &identity, &content)?
    };

    let (new_identity, new_content) = match mode {
        WorkflowMode::GitStaged => {
            let spec = format!(":0:{file}");
            (rev_parse_blob(config, shell, &spec)?, show(config, shell, &spec)?)
        }
        _ => {
            let identity = shell.file_hash(Path::new(file))?;
            let content = shell.read_file(Path::new(file))?;
            (identity, content)
        }
    };
    let new_output = runner.lint_cached(file, CacheSide::New, &new_identity, &new_content)?;

    let file_name = file_diff.new_name.clone();
    let old_messages = from_linter_output(&old_output, Some(&file_name))?;
    let new_messages = from_linter_output(&new_output, Some(&file_name))?;
    Ok(filter::new_messages(
        &ParsedDiff::Changes(file_diff),
        &old_messages,
        &new_messages,
    ))
}

/// Produce the unified diff for one file in the given mode
fn unified_diff(
    mode: &WorkflowMode,
    file: &str,
    config: &Config,
    shell: &dyn Shell,
) -> Result<String> {
    let mut args = vec!["diff".to_string(), "--no-prefix".to_string()];
    match mode {
        WorkflowMode::GitStaged => args.push("--staged".to_string()),
        WorkflowMode::GitBase(base) => args.push(base.clone()),
        _ => {}
    }
    args.push("--".to_string());
    args.push(file.to_string());

    let output = shell.execute(&config.git, &args, None)?;
    if !output.success() {
        return Err(LintGuardError::Git(format!(
            "'{} diff' failed for '{file}' with code {}",
            config.git, output.exit_code
        )));
    }
    Ok(output.stdout)
}

/// The git revision holding the old version for each mode
fn old_ref(mode: &WorkflowMode) -> &str {
    match mode {
        WorkflowMode::GitStaged => "HEAD",
        // Unstaged compares the working copy to the index
        WorkflowMode::GitUnstaged => ":0",
        WorkflowMode::GitBase(base) => base,
        _ => unreachable!("not a git mode"),
    }
}

/// Blob id of `spec` (e.g. `HEAD:path`), the cache identity for tracked content
fn rev_parse_blob(config: &Config, shell: &dyn Shell, spec: &str) -> Result<String> {
    let output = shell.execute(
        &config.git,
        &["rev-parse".to_string(), spec.to_string()],
        None,
    )?;
    if !output.success() || output.stdout.trim().is_empty() {
        return Err(LintGuardError::Git(format!("cannot resolve '{spec}'")));
    }
    Ok(output.stdout.trim().to_string())
}

/// File content at `spec` from the object database
fn show(config: &Config, shell: &dyn Shell, spec: &str) -> Result<String> {
    let output = shell.execute(&config.git, &["show".to_string(), spec.to_string()], None)?;
    if !output.success() {
        return Err(LintGuardError::Git(format!("cannot read '{spec}'")));
    }
    Ok(output.stdout)
}
