//! Character-level refinement of replaced spans

use crate::change::{CharPart, DiffOp, RefinedOp};
use crate::lcs::{diff_slices, Edit};
use tracing::{debug, warn};

/// Diff two strings character by character.
///
/// No merging happens at this level; the result is the raw
/// equal/delete/insert walk over the two character sequences.
pub fn refine_chars(old: &str, new: &str) -> Vec<CharPart> {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();

    diff_slices(&a, &b, |x, y| x == y)
        .into_iter()
        .map(|edit| match edit {
            Edit::Equal { old, .. } => CharPart::Equal(a[old]),
            Edit::Delete { old } => CharPart::Delete(a[old]),
            Edit::Insert { new } => CharPart::Insert(b[new]),
        })
        .collect()
}

/// Attach character parts to every `Replace` op.
///
/// Spans whose table would exceed `max_cells` are not diffed; they get all of
/// the old characters as deletions followed by all of the new ones as inserts.
pub fn refine_ops(ops: Vec<DiffOp>, max_cells: usize) -> Vec<RefinedOp> {
    ops.into_iter()
        .map(|op| {
            let parts = match &op {
                DiffOp::Replace { old, new } => {
                    let old_len = old.chars().count();
                    let new_len = new.chars().count();
                    let cells = (old_len + 1).saturating_mul(new_len + 1);
                    if cells > max_cells {
                        warn!(
                            old_len,
                            new_len, max_cells, "Replace span too large, skipping char refinement"
                        );
                        old.chars()
                            .map(CharPart::Delete)
                            .chain(new.chars().map(CharPart::Insert))
                            .collect()
                    } else {
                        debug!(old_len, new_len, "Refining replace span");
                        refine_chars(old, new)
                    }
                }
                _ => Vec::new(),
            };
            RefinedOp::new(op).with_parts(parts)
        })
        .collect()
}
