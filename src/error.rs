//! Error types for lintguard

use thiserror::Error;

/// Result type alias for lintguard operations
pub type Result<T> = std::result::Result<T, LintGuardError>;

/// Error types for lintguard operations
#[derive(Error, Debug)]
pub enum LintGuardError {
    /// Unified diff text could not be parsed
    #[error("Malformed diff: {0}")]
    MalformedDiff(String),

    /// Linter output could not be parsed
    #[error("Malformed linter output: {0}")]
    MalformedOutput(String),

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Conflicting or missing workflow mode options
    #[error(
        "Specify exactly one workflow: --diff/--previous-lint/--new-lint, \
         --svn, --git-staged, --git-unstaged, or --git-base <OBJECT>"
    )]
    WorkflowConflict,

    /// Persisted cache state is unreadable or malformed
    #[error("Cache is corrupt: {0}")]
    CacheCorrupt(String),

    /// Cache could not be persisted
    #[error("Failed to save cache: {0}")]
    CacheWrite(String),

    /// An external command is missing or failed to run
    #[error("External tool error: {0}")]
    ExternalTool(String),

    /// Git operation failed
    #[error("Git error: {0}")]
    Git(String),

    /// Svn operation failed
    #[error("Svn error: {0}")]
    Svn(String),

    /// File could not be opened or read
    #[error("Cannot read file '{path}': {reason}")]
    FileNotReadable { path: String, reason: String },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}
