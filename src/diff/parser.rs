//! Unified diff parser

use crate::error::{LintGuardError, Result};

use super::LineMap;

/// Classification of a single line within a diff hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// Line present only in the new version
    Added,
    /// Line present only in the old version
    Removed,
    /// Line present in both versions
    Context,
}

/// A single line of a diff hunk with its old/new line numbers
///
/// Added lines carry only a new number, removed lines only an old number,
/// context lines carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
}

/// A contiguous changed region of a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// True if the new-side line falls inside this hunk's new range
    pub(crate) fn contains_new_line(&self, new_line: u32) -> bool {
        self.new_count > 0
            && new_line >= self.new_start
            && new_line < self.new_start + self.new_count
    }

    /// True if this hunk lies entirely before the new-side line
    ///
    /// A zero-count range uses the "line before the hunk" convention of
    /// unified diffs, so its effective end is start + 1.
    pub(crate) fn ends_before_new_line(&self, new_line: u32) -> bool {
        let end = if self.new_count == 0 {
            self.new_start + 1
        } else {
            self.new_start + self.new_count
        };
        end <= new_line
    }

    /// The old-side line number immediately preceding this hunk's changes
    pub(crate) fn old_line_before(&self) -> Option<u32> {
        if self.old_count == 0 {
            // Zero-count old range: start already names the line before
            (self.old_start > 0).then_some(self.old_start)
        } else if self.old_start > 1 {
            Some(self.old_start - 1)
        } else {
            None
        }
    }
}

/// Parsed diff for a single target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// File name on the old side; `None` when the old side is absent
    /// (the diff showed `/dev/null` or equivalent)
    pub old_name: Option<String>,
    /// File name on the new side, the filter's target file
    pub new_name: String,
    pub hunks: Vec<DiffHunk>,
    /// True when the file did not exist before this change
    pub is_new_file: bool,
}

impl FileDiff {
    /// Build the old/new line correspondence map for this diff
    pub fn line_map(&self) -> LineMap<'_> {
        LineMap::new(&self.hunks)
    }
}

/// Outcome of parsing diff text
///
/// An empty diff (or one containing no hunks) is a control signal, not an
/// error: callers short-circuit without invoking the linter at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDiff {
    /// The diff described no changes
    NoChanges,
    /// The diff described changes to one file
    Changes(FileDiff),
}

impl ParsedDiff {
    /// The target (new-side) file name, when there are changes
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::NoChanges => None,
            Self::Changes(diff) => Some(&diff.new_name),
        }
    }
}

/// Parse unified-diff text for a single file
///
/// Supports hunk headers of the form `@@ -l,s +l,s @@` (counts default to 1
/// when omitted), `+`/`-`/space-prefixed body lines and the `/dev/null`
/// marker for files without a previous version. Unrecognized lines outside
/// hunk bodies (git/svn preamble such as `diff --git`, `index`, `Index:`)
/// are skipped.
///
/// # Errors
/// Returns [`LintGuardError::MalformedDiff`] when a hunk header does not
/// parse or a hunk body disagrees with its declared line counts.
pub fn parse_unified_diff(diff_text: &str) -> Result<ParsedDiff> {
    let mut old_name: Option<String> = None;
    let mut new_name: Option<String> = None;
    let mut old_missing = false;
    let mut seen_old_header = false;
    let mut seen_new_header = false;
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut current: Option<HunkBuilder> = None;

    for line in diff_text.lines() {
        // While a hunk still expects body lines, every line belongs to it
        if let Some(builder) = current.as_mut() {
            if !builder.is_complete() {
                builder.consume(line)?;
                continue;
            }
        }

        if line.starts_with("@@") {
            if let Some(builder) = current.take() {
                hunks.push(builder.finish()?);
            }
            current = Some(HunkBuilder::from_header(line)?);
        } else if let Some(rest) = line.strip_prefix("--- ") {
            if seen_old_header {
                return Err(LintGuardError::MalformedDiff(
                    "diff contains more than one file".to_string(),
                ));
            }
            seen_old_header = true;
            match parse_header_path(rest, "a/") {
                Some(name) => old_name = Some(name),
                None => old_missing = true,
            }
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            if seen_new_header {
                return Err(LintGuardError::MalformedDiff(
                    "diff contains more than one file".to_string(),
                ));
            }
            seen_new_header = true;
            new_name = parse_header_path(rest, "b/");
        } else if let Some(builder) = current.as_ref() {
            // Body-shaped lines after the declared counts are satisfied
            if matches!(line.chars().next(), Some('+' | '-' | ' ')) {
                return Err(builder.overrun());
            }
        }
        // Anything else outside a hunk body is preamble; skip it.
    }

    if let Some(builder) = current.take() {
        hunks.push(builder.finish()?);
    }

    if hunks.is_empty() {
        return Ok(ParsedDiff::NoChanges);
    }

    let new_name = new_name.ok_or_else(|| {
        LintGuardError::MalformedDiff("diff has hunks but no '+++' file header".to_string())
    })?;

    Ok(ParsedDiff::Changes(FileDiff {
        is_new_file: old_missing,
        old_name,
        new_name,
        hunks,
    }))
}

/// Extract the file path from a `---`/`+++` header line
///
/// Strips a trailing tab-separated annotation (timestamps, svn's
/// `(revision N)`) and the conventional `a/`/`b/` prefix. Returns `None`
/// for the `/dev/null` no-previous-file marker.
fn parse_header_path(rest: &str, prefix: &str) -> Option<String> {
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    if path == "/dev/null" {
        return None;
    }
    let path = path.strip_prefix(prefix).unwrap_or(path);
    Some(path.to_string())
}

struct HunkBuilder {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    next_old: u32,
    next_new: u32,
    remaining_old: u32,
    remaining_new: u32,
    lines: Vec<DiffLine>,
}

impl HunkBuilder {
    fn from_header(line: &str) -> Result<Self> {
        let (old_start, old_count, new_start, new_count) =
            parse_hunk_header(line).ok_or_else(|| {
                LintGuardError::MalformedDiff(format!("invalid hunk header '{line}'"))
            })?;
        Ok(Self {
            old_start,
            old_count,
            new_start,
            new_count,
            next_old: old_start,
            next_new: new_start,
            remaining_old: old_count,
            remaining_new: new_count,
            lines: Vec::with_capacity((old_count + new_count) as usize),
        })
    }

    fn is_complete(&self) -> bool {
        self.remaining_old == 0 && self.remaining_new == 0
    }

    fn consume(&mut self, line: &str) -> Result<()> {
        match line.chars().next() {
            Some('+') => {
                if self.remaining_new == 0 {
                    return Err(self.overrun());
                }
                self.lines.push(DiffLine {
                    kind: DiffLineKind::Added,
                    old_line: None,
                    new_line: Some(self.next_new),
                });
                self.next_new += 1;
                self.remaining_new -= 1;
            }
            Some('-') => {
                if self.remaining_old == 0 {
                    return Err(self.overrun());
                }
                self.lines.push(DiffLine {
                    kind: DiffLineKind::Removed,
                    old_line: Some(self.next_old),
                    new_line: None,
                });
                self.next_old += 1;
                self.remaining_old -= 1;
            }
            // Some diff producers emit a truly empty line for empty context
            Some(' ') | None => {
                if self.remaining_old == 0 || self.remaining_new == 0 {
                    return Err(self.overrun());
                }
                self.lines.push(DiffLine {
                    kind: DiffLineKind::Context,
                    old_line: Some(self.next_old),
                    new_line: Some(self.next_new),
                });
                self.next_old += 1;
                self.next_new += 1;
                self.remaining_old -= 1;
                self.remaining_new -= 1;
            }
            // "\ No newline at end of file" does not count toward either side
            Some('\\') => {}
            Some(other) => {
                return Err(LintGuardError::MalformedDiff(format!(
                    "unexpected character '{other}' in hunk body"
                )));
            }
        }
        Ok(())
    }

    fn overrun(&self) -> LintGuardError {
        LintGuardError::MalformedDiff(format!(
            "hunk body longer than declared counts at -{},{} +{},{}",
            self.old_start, self.old_count, self.new_start, self.new_count
        ))
    }

    fn finish(self) -> Result<DiffHunk> {
        if !self.is_complete() {
            return Err(LintGuardError::MalformedDiff(format!(
                "hunk body shorter than declared counts at -{},{} +{},{}",
                self.old_start, self.old_count, self.new_start, self.new_count
            )));
        }
        Ok(DiffHunk {
            old_start: self.old_start,
            old_count: self.old_count,
            new_start: self.new_start,
            new_count: self.new_count,
            lines: self.lines,
        })
    }
}

/// Parse `@@ -oldStart,oldCount +newStart,newCount @@`; counts default to 1
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let rest = line.strip_prefix("@@ -")?;
    let (old_part, rest) = rest.split_once(' ')?;
    let rest = rest.strip_prefix('+')?;
    let (new_part, _) = rest.split_once(" @@")?;
    let (old_start, old_count) = parse_range(old_part)?;
    let (new_start, new_count) = parse_range(new_part)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
