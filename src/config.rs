//! Configuration types for lintguard

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{LintGuardError, Result};

/// Default config file looked up in the invocation directory
pub const DEFAULT_CONFIG_FILE: &str = ".lintguardrc.json";

/// Default cache file
pub const DEFAULT_CACHE_FILE: &str = ".lintguard-cache.json";

/// Output reporter for filtered messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable console output
    #[default]
    Human,
    /// JSON output with structured data
    Json,
    /// Checkstyle-style XML for tool integration
    Xml,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(LintGuardError::InvalidConfig(format!(
                "unknown reporter '{other}' (expected human, json, or xml)"
            ))),
        }
    }
}

/// How the old and new versions of each file are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowMode {
    /// Diff and both linter outputs supplied as files
    Manual {
        diff: PathBuf,
        previous_lint: PathBuf,
        new_lint: PathBuf,
    },
    /// svn-versioned files: working copy vs last committed revision
    Svn,
    /// Staged git version vs HEAD
    GitStaged,
    /// Working copy vs staged (or HEAD) git version
    GitUnstaged,
    /// Working copy vs the merge-base with a git object
    GitBase(String),
}

/// Command and arguments for one linter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterOptions {
    pub command: String,
    pub args: Vec<String>,
}

/// Resolved configuration for a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Version control executables
    pub git: String,
    pub svn: String,

    /// Name of the linter to run (key into `linters`)
    pub linter: String,
    pub linters: BTreeMap<String, LinterOptions>,

    pub workflow: WorkflowMode,
    /// Files to check in the automatic workflows
    pub files: Vec<String>,

    pub report: ReportFormat,
    pub debug: bool,

    pub cache_enabled: bool,
    pub clear_cache: bool,
    pub cache_path: PathBuf,

    /// Worker threads for per-file processing
    pub num_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        let mut linters = BTreeMap::new();
        linters.insert(
            "phpcs".to_string(),
            LinterOptions {
                command: "phpcs".to_string(),
                args: vec!["--report=json".to_string(), "-q".to_string()],
            },
        );
        Self {
            git: "git".to_string(),
            svn: "svn".to_string(),
            linter: "phpcs".to_string(),
            linters,
            workflow: WorkflowMode::GitUnstaged,
            files: Vec::new(),
            report: ReportFormat::Human,
            debug: false,
            cache_enabled: false,
            clear_cache: false,
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            num_threads: num_cpus::get(),
        }
    }
}

impl Config {
    /// Options for the configured linter
    pub fn linter_options(&self) -> Result<&LinterOptions> {
        self.linters.get(&self.linter).ok_or_else(|| {
            LintGuardError::InvalidConfig(format!(
                "no options configured for linter '{}'",
                self.linter
            ))
        })
    }

    /// Identifier for the active ruleset, used as a cache key component
    ///
    /// Includes the linter name, command, and arguments so that two
    /// configurations can never share cache entries on content identity
    /// alone.
    pub fn ruleset_id(&self) -> Result<String> {
        let options = self.linter_options()?;
        Ok(format!(
            "{}:{} {}",
            self.linter,
            options.command,
            options.args.join(" ")
        ))
    }

    /// Overlay settings from config-file JSON onto this config
    ///
    /// Format:
    /// `{"version-control": {"git", "svn"},
    ///   "linter-options": {name: {"command", "args"}}}`
    pub fn apply_file(&mut self, json: &str) -> Result<()> {
        let raw: ConfigFile = serde_json::from_str(json)
            .map_err(|e| LintGuardError::InvalidConfig(format!("config file: {e}")))?;

        if let Some(vc) = raw.version_control {
            if let Some(git) = vc.git {
                self.git = git;
            }
            if let Some(svn) = vc.svn {
                self.svn = svn;
            }
        }
        if let Some(linters) = raw.linter_options {
            for (name, options) in linters {
                let entry = self
                    .linters
                    .entry(name.clone())
                    .or_insert_with(|| LinterOptions {
                        command: name,
                        args: Vec::new(),
                    });
                if let Some(command) = options.command {
                    entry.command = command;
                }
                if let Some(args) = options.args {
                    entry.args = args;
                }
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigFile {
    version_control: Option<VersionControlFile>,
    linter_options: Option<BTreeMap<String, LinterOptionsFile>>,
}

#[derive(Deserialize)]
struct VersionControlFile {
    git: Option<String>,
    svn: Option<String>,
}

#[derive(Deserialize)]
struct LinterOptionsFile {
    command: Option<String>,
    args: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_linter_is_phpcs() {
        let config = Config::default();
        let options = config.linter_options().unwrap();
        assert_eq!(options.command, "phpcs");
        assert_eq!(options.args, vec!["--report=json", "-q"]);
    }

    #[test]
    fn test_apply_file_overrides_version_control() {
        let mut config = Config::default();
        config
            .apply_file(r#"{"version-control": {"git": "/usr/local/bin/git"}}"#)
            .unwrap();
        assert_eq!(config.git, "/usr/local/bin/git");
        assert_eq!(config.svn, "svn");
    }

    #[test]
    fn test_apply_file_args_land_in_args_field() {
        // Linter args from the config file must populate `args`, never
        // overwrite the command path.
        let mut config = Config::default();
        config
            .apply_file(
                r#"{"linter-options": {"phpcs": {
                    "command": "/usr/local/bin/phpcs",
                    "args": ["--standard=MyStandard", "--report=json"]
                }}}"#,
            )
            .unwrap();
        let options = config.linter_options().unwrap();
        assert_eq!(options.command, "/usr/local/bin/phpcs");
        assert_eq!(options.args, vec!["--standard=MyStandard", "--report=json"]);
    }

    #[test]
    fn test_apply_file_adds_new_linter() {
        let mut config = Config::default();
        config
            .apply_file(r#"{"linter-options": {"tsc": {"args": ["-p", ".tsconfig.json"]}}}"#)
            .unwrap();
        let tsc = config.linters.get("tsc").unwrap();
        assert_eq!(tsc.command, "tsc");
        assert_eq!(tsc.args, vec!["-p", ".tsconfig.json"]);
    }

    #[test]
    fn test_apply_file_invalid_json_fails() {
        let mut config = Config::default();
        let err = config.apply_file("{broken").unwrap_err();
        assert!(matches!(err, LintGuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_ruleset_id_includes_linter_and_args() {
        let mut config = Config::default();
        let id_default = config.ruleset_id().unwrap();

        config
            .apply_file(r#"{"linter-options": {"phpcs": {"args": ["--standard=Other"]}}}"#)
            .unwrap();
        let id_other = config.ruleset_id().unwrap();
        assert_ne!(id_default, id_other);
    }

    #[test]
    fn test_report_format_from_name() {
        assert_eq!(ReportFormat::from_name("human").unwrap(), ReportFormat::Human);
        assert_eq!(ReportFormat::from_name("json").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::from_name("xml").unwrap(), ReportFormat::Xml);
        assert!(ReportFormat::from_name("yaml").is_err());
    }
}
