//! lintguard - Change-aware lint message filtering
//!
//! Runs a linter against the old and new versions of changed files and
//! reports only the messages caused by the changes, so existing projects
//! can adopt strict rulesets without paying the legacy backlog up front.

mod cache;
mod cli;
mod config;
mod diff;
mod error;
mod filter;
mod messages;
mod report;
mod shell;
mod workflow;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use report::create_reporter;
use shell::SystemShell;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("lintguard: {err}");
            return ExitCode::from(2);
        }
    };

    let debug_enabled = config.debug;
    let debug = move |message: &str| {
        if debug_enabled {
            eprintln!("lintguard: {message}");
        }
    };

    let shell = SystemShell::new();
    let outcome = match workflow::run(&config, &shell, &debug) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("lintguard: {err}");
            return ExitCode::from(2);
        }
    };

    let reporter = create_reporter(config.report);
    let output = match reporter.format(&outcome.messages) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("lintguard: {err}");
            return ExitCode::from(2);
        }
    };
    let mut stdout = std::io::stdout();
    if stdout.write_all(output.as_bytes()).is_err() {
        return ExitCode::from(2);
    }

    // The lint results above are valid even when the cache cannot be
    // persisted; report the failure after them so they are not lost
    if let Some(err) = outcome.cache_error {
        eprintln!("lintguard: {err}");
        eprintln!("lintguard: re-run with --no-cache to bypass the cache");
        return ExitCode::from(2);
    }

    ExitCode::from(reporter.exit_code(&outcome.messages))
}
