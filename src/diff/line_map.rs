//! Old/new line correspondence derived from parsed diff hunks

use super::parser::{DiffHunk, DiffLineKind};

/// Line correspondence map for one file's diff
///
/// Answers the two questions the change filter needs: is a new-side line
/// part of the change region, and which old-side line does a new-side line
/// correspond to.
pub struct LineMap<'a> {
    hunks: &'a [DiffHunk],
}

impl<'a> LineMap<'a> {
    pub(crate) fn new(hunks: &'a [DiffHunk]) -> Self {
        Self { hunks }
    }

    /// True if the new-side line was added by this change
    pub fn is_added_line(&self, new_line: u32) -> bool {
        self.hunks
            .iter()
            .flat_map(|hunk| &hunk.lines)
            .any(|line| line.kind == DiffLineKind::Added && line.new_line == Some(new_line))
    }

    /// The old-side line corresponding to a new-side line
    ///
    /// Context lines map directly. Added lines map to the old-side insertion
    /// point (the last old line consumed before the addition), so a rewritten
    /// line can be matched against the violation it replaced. Lines outside
    /// every hunk map 1:1 shifted by the cumulative size delta of the hunks
    /// above them. Returns `None` when no old line exists (e.g. an insertion
    /// at the top of the file).
    pub fn old_line_for_new(&self, new_line: u32) -> Option<u32> {
        for hunk in self.hunks {
            if hunk.contains_new_line(new_line) {
                return Self::old_line_within_hunk(hunk, new_line);
            }
        }

        // Unchanged region: constant offset from the hunks entirely above
        let mut old = i64::from(new_line);
        for hunk in self.hunks {
            if hunk.ends_before_new_line(new_line) {
                old += i64::from(hunk.old_count) - i64::from(hunk.new_count);
            }
        }
        u32::try_from(old).ok().filter(|line| *line >= 1)
    }

    fn old_line_within_hunk(hunk: &DiffHunk, new_line: u32) -> Option<u32> {
        let mut last_old = hunk.old_line_before();
        for line in &hunk.lines {
            if line.new_line == Some(new_line) {
                return match line.kind {
                    DiffLineKind::Context => line.old_line,
                    DiffLineKind::Added => last_old,
                    // Removed lines have no new number, unreachable here
                    DiffLineKind::Removed => None,
                };
            }
            if let Some(old) = line.old_line {
                last_old = Some(old);
            }
        }
        None
    }
}
