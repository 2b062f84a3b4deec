//! Content-addressed cache of linter invocations
//!
//! Stores raw linter output keyed by (file, side, content identity,
//! ruleset) so unchanged files do not trigger a re-run of the linter. The
//! store lives in a single versioned JSON file loaded once at startup and
//! persisted once at the end of a run.

mod storage;

pub use storage::{CacheKey, CacheSide, ResultCache, CACHE_VERSION};
