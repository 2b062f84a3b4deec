//! CLI argument parsing using clap

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ReportFormat, WorkflowMode, DEFAULT_CONFIG_FILE};
use crate::error::{LintGuardError, Result};

/// Run code linters but report only the messages caused by recent changes
#[derive(Parser, Debug)]
#[command(name = "lintguard")]
#[command(version)]
#[command(
    about = "Run code linters but report only the messages caused by recent changes",
    long_about = None
)]
pub struct Cli {
    /// Linter to run (must have an entry in the config's linter-options)
    #[arg(long, value_name = "LINTER", default_value = "phpcs")]
    pub linter: String,

    /// Manual mode: file containing a unified diff of the changes
    #[arg(long, value_name = "FILE")]
    pub diff: Option<PathBuf>,

    /// Manual mode: file with linter JSON output for the unchanged version
    #[arg(long = "previous-lint", value_name = "FILE")]
    pub previous_lint: Option<PathBuf>,

    /// Manual mode: file with linter JSON output for the changed version
    #[arg(long = "new-lint", value_name = "FILE")]
    pub new_lint: Option<PathBuf>,

    /// Assume svn-versioned files
    #[arg(long)]
    pub svn: bool,

    /// Compare the staged git version to the HEAD version
    #[arg(long = "git-staged")]
    pub git_staged: bool,

    /// Compare the git working copy to the staged (or HEAD) version
    #[arg(long = "git-unstaged")]
    pub git_unstaged: bool,

    /// Compare the working copy to the merge-base with OBJECT
    #[arg(long = "git-base", value_name = "OBJECT")]
    pub git_base: Option<String>,

    /// Path to the config file (default: .lintguardrc.json if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output reporter: human, json, or xml
    #[arg(long, value_name = "REPORTER", default_value = "human")]
    pub report: String,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Cache linter output for improved performance
    #[arg(long)]
    pub cache: bool,

    /// Disable caching (wins over --cache; does not remove an existing cache)
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Clear the cache before running
    #[arg(long = "clear-cache")]
    pub clear_cache: bool,

    /// Cache file location
    #[arg(long = "cache-file", value_name = "FILE")]
    pub cache_file: Option<PathBuf>,

    /// Number of worker threads for per-file processing
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Files to check (automatic modes)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

impl Cli {
    /// Parse command line arguments into a [`Config`]
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::default();

        // Explicit --config must exist; the default path is optional
        match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    LintGuardError::FileNotReadable {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                config.apply_file(&json)?;
            }
            None => {
                if let Ok(json) = std::fs::read_to_string(DEFAULT_CONFIG_FILE) {
                    config.apply_file(&json)?;
                }
            }
        }

        config.workflow = self.workflow_mode()?;
        config.linter = self.linter;
        config.files = self.files;
        config.report = ReportFormat::from_name(&self.report)?;
        config.debug = self.debug;
        config.cache_enabled = self.cache && !self.no_cache;
        config.clear_cache = self.clear_cache;
        if let Some(path) = self.cache_file {
            config.cache_path = path;
        }
        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(LintGuardError::InvalidConfig(
                    "--threads must be at least 1".to_string(),
                ));
            }
            config.num_threads = threads;
        }

        if let WorkflowMode::Manual { .. } = config.workflow {
            // Manual mode carries its inputs in the flags
        } else if config.files.is_empty() {
            return Err(LintGuardError::InvalidConfig(
                "no files to check; pass one or more file paths".to_string(),
            ));
        }

        config.linter_options()?;
        Ok(config)
    }

    fn workflow_mode(&self) -> Result<WorkflowMode> {
        let manual_flags =
            [self.diff.is_some(), self.previous_lint.is_some(), self.new_lint.is_some()];
        let manual = manual_flags.iter().any(|flag| *flag);
        if manual && !manual_flags.iter().all(|flag| *flag) {
            return Err(LintGuardError::InvalidConfig(
                "manual mode requires --diff, --previous-lint, and --new-lint together"
                    .to_string(),
            ));
        }

        let mode_count = usize::from(manual)
            + usize::from(self.svn)
            + usize::from(self.git_staged)
            + usize::from(self.git_unstaged)
            + usize::from(self.git_base.is_some());
        if mode_count != 1 {
            return Err(LintGuardError::WorkflowConflict);
        }

        if manual {
            return Ok(WorkflowMode::Manual {
                diff: self.diff.clone().unwrap(),
                previous_lint: self.previous_lint.clone().unwrap(),
                new_lint: self.new_lint.clone().unwrap(),
            });
        }
        if self.svn {
            return Ok(WorkflowMode::Svn);
        }
        if self.git_staged {
            return Ok(WorkflowMode::GitStaged);
        }
        if self.git_unstaged {
            return Ok(WorkflowMode::GitUnstaged);
        }
        Ok(WorkflowMode::GitBase(self.git_base.clone().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_git_staged_mode() {
        let cli = Cli::parse_from(["lintguard", "--git-staged", "file.php"]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.workflow, WorkflowMode::GitStaged);
        assert_eq!(config.files, vec!["file.php"]);
        assert_eq!(config.report, ReportFormat::Human);
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_cli_git_base_mode() {
        let cli = Cli::parse_from(["lintguard", "--git-base", "origin/main", "file.php"]);
        let config = cli.into_config().unwrap();
        assert_eq!(
            config.workflow,
            WorkflowMode::GitBase("origin/main".to_string())
        );
    }

    #[test]
    fn test_cli_manual_mode() {
        let cli = Cli::parse_from([
            "lintguard",
            "--diff",
            "changes.diff",
            "--previous-lint",
            "old.json",
            "--new-lint",
            "new.json",
        ]);
        let config = cli.into_config().unwrap();
        assert!(matches!(config.workflow, WorkflowMode::Manual { .. }));
    }

    #[test]
    fn test_cli_manual_mode_requires_all_three_flags() {
        let cli = Cli::parse_from(["lintguard", "--diff", "changes.diff"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_conflicting_modes() {
        let cli = Cli::parse_from(["lintguard", "--svn", "--git-staged", "file.php"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::WorkflowConflict));
    }

    #[test]
    fn test_cli_no_mode() {
        let cli = Cli::parse_from(["lintguard", "file.php"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::WorkflowConflict));
    }

    #[test]
    fn test_cli_automatic_mode_requires_files() {
        let cli = Cli::parse_from(["lintguard", "--git-staged"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_debug_sets_debug_flag_not_reporter() {
        let cli = Cli::parse_from(["lintguard", "--git-staged", "--debug", "file.php"]);
        let config = cli.into_config().unwrap();
        assert!(config.debug);
        assert_eq!(config.report, ReportFormat::Human);
    }

    #[test]
    fn test_cli_no_cache_wins_over_cache() {
        let cli = Cli::parse_from([
            "lintguard",
            "--git-staged",
            "--cache",
            "--no-cache",
            "file.php",
        ]);
        let config = cli.into_config().unwrap();
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_cli_cache_flag() {
        let cli = Cli::parse_from(["lintguard", "--git-staged", "--cache", "file.php"]);
        let config = cli.into_config().unwrap();
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_cli_unknown_reporter() {
        let cli = Cli::parse_from(["lintguard", "--git-staged", "--report", "tsv", "file.php"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_unknown_linter_rejected() {
        let cli = Cli::parse_from([
            "lintguard",
            "--git-staged",
            "--linter",
            "eslint",
            "file.js",
        ]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_zero_threads_rejected() {
        let cli = Cli::parse_from(["lintguard", "--git-staged", "-j", "0", "file.php"]);
        let err = cli.into_config().unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }
}
