//! Svn workflow: working copy vs the last committed revision
//!
//! `svn info` supplies both the cache identity for the old side (the last
//! changed revision) and the scheduled-add marker that diff output alone
//! does not carry.

use std::path::Path;

use crate::cache::CacheSide;
use crate::config::Config;
use crate::diff::{parse_unified_diff, ParsedDiff};
use crate::error::{LintGuardError, Result};
use crate::filter;
use crate::messages::{from_linter_output, MessageSet};
use crate::shell::Shell;

use super::LintRunner;

pub(super) fn run_for_file(
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

    let info = file_info(file, config, shell)?;

    let output = shell.execute(
        &config.svn,
        &["diff".to_string(), file.to_string()],
        None,
    )?;
    if !output.success() {
        return Err(LintGuardError::Svn(format!(
            "'{} diff' failed for '{file}' with code {}",
            config.svn, output.exit_code
        )));
    }

    let mut file_diff = match parse_unified_diff(&output.stdout)? {
        ParsedDiff::NoChanges => {
            (runner.debug)(&format!("no changes in '{file}', skipping lint"));
            return Ok(MessageSet::new());
        }
        ParsedDiff::Changes(file_diff) => file_diff,
    };
    // svn diffs for scheduled adds look like ordinary diffs against an
    // empty revision 0 file; trust the schedule over the diff headers
    file_diff.is_new_file = file_diff.is_new_file || info.is_scheduled_add;

    let old_output = if file_diff.is_new_file {
        (runner.debug)(&format!("'{file}' is new, not linting the old version"));
        String::new()
    } else {
        let revision = info.last_changed_revision.ok_or_else(|| {
            LintGuardError::Svn(format!("no last changed revision for '{file}'"))
        })?;
        let cat = shell.execute(
            &config.svn,
            &["cat".to_string(), file.to_string()],
            None,
        )?;
        if !cat.success() {
            return Err(LintGuardError::Svn(format!(
                "'{} cat' failed for '{file}' with code {}",
                config.svn, cat.exit_code
            )));
        }
        runner.lint_cached(file, CacheSide::Old, &revision, &cat.stdout)?
    };

    let new_identity = shell.file_hash(Path::new(file))?;
    let new_content = shell.read_file(Path::new(file))?;
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

struct SvnInfo {
    last_changed_revision: Option<String>,
    is_scheduled_add: bool,
}

fn file_info(file: &str, config: &Config, shell: &dyn Shell) -> Result<SvnInfo> {
    let output = shell.execute(
        &config.svn,
        &["info".to_string(), file.to_string()],
        None,
    )?;
    if !output.success() {
        return Err(LintGuardError::Svn(format!(
            "'{} info' failed for '{file}' with code {}",
            config.svn, output.exit_code
        )));
    }
    Ok(parse_info(&output.stdout))
}

fn parse_info(stdout: &str) -> SvnInfo {
    let mut info = SvnInfo {
        last_changed_revision: None,
        is_scheduled_add: false,
    };
    for line in stdout.lines() {
        if let Some(revision) = line.strip_prefix("Last Changed Rev:") {
            info.last_changed_revision = Some(revision.trim().to_string());
        } else if let Some(schedule) = line.strip_prefix("Schedule:") {
            info.is_scheduled_add = schedule.trim() == "add";
        }
    }
    info
}
