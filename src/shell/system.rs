//! Shell implementation backed by std::process

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::error::{LintGuardError, Result};

use super::{CommandOutput, Shell};

/// Poll interval while waiting for a child process
const WAIT_POLL: Duration = Duration::from_millis(10);

/// [`Shell`] implementation that spawns real processes
pub struct SystemShell {
    timeout: Option<Duration>,
}

impl SystemShell {
    /// Create a shell with no command timeout
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Create a shell that kills commands exceeding `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    fn wait_with_timeout(&self, child: &mut Child, command: &str) -> Result<i32> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.code().unwrap_or(-1));
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    // Abort cleanly; the caller must not write cache entries
                    // for this invocation
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(LintGuardError::ExternalTool(format!(
                        "'{command}' timed out"
                    )));
                }
            }
            std::thread::sleep(WAIT_POLL);
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for SystemShell {
    fn execute(
        &self,
        command: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<CommandOutput> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| {
            LintGuardError::ExternalTool(format!("failed to run '{command}': {e}"))
        })?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // The child may exit without draining stdin; a broken pipe
                // here is not an error
                let _ = pipe.write_all(input.as_bytes());
            }
        }

        // Drain stdout on a separate thread so a chatty child cannot
        // deadlock against the timeout loop
        let stdout_pipe = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut buffer = String::new();
            if let Some(mut pipe) = stdout_pipe {
                let _ = pipe.read_to_string(&mut buffer);
            }
            buffer
        });

        let exit_code = self.wait_with_timeout(&mut child, command)?;
        let stdout = reader.join().unwrap_or_default();

        Ok(CommandOutput { stdout, exit_code })
    }

    fn command_exists(&self, command: &str) -> bool {
        Command::new(command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn file_hash(&self, path: &Path) -> Result<String> {
        let mut file = File::open(path).map_err(|e| LintGuardError::FileNotReadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| LintGuardError::FileNotReadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn is_readable(&self, path: &Path) -> bool {
        File::open(path).is_ok()
    }
}
