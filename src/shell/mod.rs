//! Shell execution capability
//!
//! The core never spawns processes itself; workflows depend on this narrow
//! interface so tests can substitute a fake and the real implementation
//! stays in one place.

mod system;

use std::path::Path;

use crate::error::Result;

pub use system::SystemShell;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability interface for everything that touches the outside world
pub trait Shell: Sync {
    /// Run a command with arguments, optionally feeding `stdin`, and
    /// capture stdout and the exit code
    fn execute(&self, command: &str, args: &[String], stdin: Option<&str>)
        -> Result<CommandOutput>;

    /// True if the command can be invoked at all
    fn command_exists(&self, command: &str) -> bool;

    /// Content hash of a file on disk, for cache identity
    fn file_hash(&self, path: &Path) -> Result<String>;

    /// Read a file from the working copy
    fn read_file(&self, path: &Path) -> Result<String>;

    /// True if the file exists and can be opened for reading
    fn is_readable(&self, path: &Path) -> bool;
}
