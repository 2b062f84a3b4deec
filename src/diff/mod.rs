//! Unified diff parsing and line correspondence mapping
//!
//! This module consumes unified-diff text produced by version-control tools
//! and derives the old/new line correspondence used to decide which lint
//! messages belong to the current change set. It does not compute diffs
//! itself.

mod line_map;
mod parser;

pub use line_map::LineMap;
pub use parser::{parse_unified_diff, DiffHunk, DiffLine, DiffLineKind, FileDiff, ParsedDiff};
