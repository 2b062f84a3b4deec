//! Change-aware message filtering
//!
//! Cross-references the new linter output against the diff's line map and
//! the old linter output to keep only the messages attributable to the
//! current change set.

use crate::diff::ParsedDiff;
use crate::messages::MessageSet;

/// Filter the new-side messages down to those introduced by the change
///
/// Policy, per message in the new set for the diff's target file:
/// - no diff means nothing is attributable to recent changes: empty result;
/// - a brand-new file has no prior version, so every message is included;
/// - otherwise a message is included iff its line was added by the diff and
///   the old output has no message with the same `(code, text)` at the
///   corresponding old line;
/// - messages on unchanged (context) lines are drift, never included.
///
/// Ordering follows the new set's per-file ordering; duplicates are not
/// collapsed. This classifies new vs old, it does not de-duplicate.
pub fn new_messages(diff: &ParsedDiff, old: &MessageSet, new: &MessageSet) -> MessageSet {
    let file_diff = match diff {
        ParsedDiff::NoChanges => return MessageSet::new(),
        ParsedDiff::Changes(file_diff) => file_diff,
    };

    let target = file_diff.new_name.as_str();
    if file_diff.is_new_file {
        return MessageSet::from_messages(new.for_file(target).cloned().collect());
    }

    let map = file_diff.line_map();
    let kept = new
        .for_file(target)
        .filter(|message| {
            if !map.is_added_line(message.line) {
                return false;
            }
            match map.old_line_for_new(message.line) {
                Some(old_line) => !old
                    .for_file(target)
                    .any(|candidate| candidate.line == old_line && candidate.same_violation(message)),
                None => true,
            }
        })
        .cloned()
        .collect();
    MessageSet::from_messages(kept)
}
