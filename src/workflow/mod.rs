//! Per-file workflows and the batch driver
//!
//! Each workflow produces, for every file, the unified diff plus the old-
//! and new-side linter output (live run or cache hit), then hands them to
//! the change filter. Files are independent of each other, so the batch
//! driver processes them on a rayon worker pool; the cache is the only
//! shared state and sits behind a mutex.

mod git;
mod manual;
mod svn;

use std::sync::Mutex;

use rayon::prelude::*;

use crate::cache::{CacheKey, CacheSide, ResultCache};
use crate::config::{Config, LinterOptions, WorkflowMode};
use crate::error::{LintGuardError, Result};
use crate::messages::MessageSet;
use crate::shell::Shell;

/// Debug sink; enabled with `--debug`, writes to stderr
pub type DebugFn<'a> = &'a (dyn Fn(&str) + Sync);

/// Result of a whole run
pub struct RunOutcome {
    pub messages: MessageSet,
    /// Set when the lint results are valid but the cache could not be
    /// persisted; reported after the messages so they are not lost
    pub cache_error: Option<LintGuardError>,
}

/// Execute the configured workflow
pub fn run(config: &Config, shell: &dyn Shell, debug: DebugFn) -> Result<RunOutcome> {
    match &config.workflow {
        WorkflowMode::Manual {
            diff,
            previous_lint,
            new_lint,
        } => Ok(RunOutcome {
            messages: manual::run(diff, previous_lint, new_lint)?,
            cache_error: None,
        }),
        mode => run_automatic(mode, config, shell, debug),
    }
}

fn run_automatic(
    mode: &WorkflowMode,
    config: &Config,
    shell: &dyn Shell,
    debug: DebugFn,
) -> Result<RunOutcome> {
    let linter = config.linter_options()?;
    let ruleset = config.ruleset_id()?;

    debug("validating executables");
    let vcs = match mode {
        WorkflowMode::Svn => &config.svn,
        _ => &config.git,
    };
    for command in [vcs.as_str(), linter.command.as_str()] {
        if !shell.command_exists(command) {
            return Err(LintGuardError::ExternalTool(format!(
                "required command '{command}' is not available"
            )));
        }
    }
    debug("executables are valid");

    // Resolve --git-base to the merge base once for the whole batch
    let mode = match mode {
        WorkflowMode::GitBase(object) => {
            WorkflowMode::GitBase(git::merge_base(config, shell, object)?)
        }
        other => other.clone(),
    };

    let cache = setup_cache(config, debug);
    let runner = LintRunner {
        shell,
        linter,
        cache: cache.as_ref(),
        ruleset: &ruleset,
        debug,
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| LintGuardError::Other(format!("failed to build worker pool: {e}")))?;

    let results: Vec<(String, Result<MessageSet>)> = pool.install(|| {
        config
            .files
            .par_iter()
            .map(|file| {
                let result = match &mode {
                    WorkflowMode::Svn => svn::run_for_file(file, config, &runner),
                    _ => git::run_for_file(&mode, file, config, &runner),
                };
                (file.clone(), result)
            })
            .collect()
    });

    let mut sets = Vec::new();
    for (file, result) in results {
        match result {
            Ok(set) => sets.push(set),
            // Input contract violations are fatal for that file only
            Err(err)
                if matches!(
                    err,
                    LintGuardError::MalformedDiff(_) | LintGuardError::MalformedOutput(_)
                ) =>
            {
                eprintln!("lintguard: skipping '{file}': {err}");
            }
            Err(err) => return Err(err),
        }
    }

    let cache_error = match cache {
        Some(mutex) => {
            let cache = mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            cache.save().err()
        }
        None => None,
    };

    Ok(RunOutcome {
        messages: MessageSet::merge(sets),
        cache_error,
    })
}

/// Load the cache per the configured flags
///
/// A corrupt store is logged, wiped from disk, and the run continues
/// uncached; serving possibly-wrong cached output is never an option.
fn setup_cache(config: &Config, debug: DebugFn) -> Option<Mutex<ResultCache>> {
    if config.clear_cache {
        let empty = ResultCache::new(&config.cache_path);
        if let Err(err) = empty.save() {
            eprintln!("lintguard: failed to clear cache: {err}");
        }
    }

    if !config.cache_enabled {
        return None;
    }

    match ResultCache::load(&config.cache_path) {
        Ok(cache) => {
            debug(&format!("cache loaded with {} entries", cache.len()));
            Some(Mutex::new(cache))
        }
        Err(err) => {
            eprintln!("lintguard: {err}");
            eprintln!(
                "lintguard: the cache will be cleared and this run will proceed uncached"
            );
            let empty = ResultCache::new(&config.cache_path);
            if let Err(err) = empty.remove_file().and_then(|()| empty.save()) {
                eprintln!("lintguard: failed to clear cache: {err}");
            }
            None
        }
    }
}

/// Shared per-file lint invocation with cache lookaside
pub(crate) struct LintRunner<'a> {
    pub shell: &'a dyn Shell,
    pub linter: &'a LinterOptions,
    pub cache: Option<&'a Mutex<ResultCache>>,
    pub ruleset: &'a str,
    pub debug: DebugFn<'a>,
}

impl LintRunner<'_> {
    /// Lint `content` for one side of `file`, going through the cache
    ///
    /// Content is fed to the linter over stdin with the real path supplied
    /// separately, so old versions never need to exist on disk. No cache
    /// entry is written when the invocation fails.
    pub(crate) fn lint_cached(
        &self,
        file: &str,
        side: CacheSide,
        identity: &str,
        content: &str,
    ) -> Result<String> {
        let key = CacheKey {
            file: file.to_string(),
            side,
            identity: identity.to_string(),
            ruleset: self.ruleset.to_string(),
        };

        if let Some(cache) = self.cache {
            let guard = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(hit) = guard.get(&key) {
                (self.debug)(&format!(
                    "using cache for {} file '{file}' at '{identity}'",
                    side.label()
                ));
                return Ok(hit.to_string());
            }
        }

        (self.debug)(&format!(
            "not using cache for {} file '{file}' at '{identity}'",
            side.label()
        ));
        let output = self.run_linter(file, content)?;

        if let Some(cache) = self.cache {
            cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .put(key, output.clone());
        }
        Ok(output)
    }

    fn run_linter(&self, file: &str, content: &str) -> Result<String> {
        let mut args = self.linter.args.clone();
        args.push(format!("--stdin-path={file}"));
        args.push("-".to_string());

        let output = self
            .shell
            .execute(&self.linter.command, &args, Some(content))?;
        // Linters exit non-zero when they find violations; only a failure
        // with no output at all means the invocation itself broke
        if output.stdout.trim().is_empty() && !output.success() {
            return Err(LintGuardError::ExternalTool(format!(
                "'{}' exited with code {} and produced no output",
                self.linter.command, output.exit_code
            )));
        }
        Ok(output.stdout)
    }
}

impl CacheSide {
    fn label(self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }
}
