//! Coalescing of raw token edits into substitutions and runs

use crate::change::DiffOp;
use crate::token::is_blank;

/// Merge a raw op sequence left to right.
///
/// A `Delete` directly followed by an `Insert` becomes a `Replace` unless
/// either side is pure whitespace. Adjacent deletes (or inserts) are joined
/// into one op. Everything else is kept as is.
pub fn merge_ops(raw: Vec<DiffOp>) -> Vec<DiffOp> {
    let mut merged: Vec<DiffOp> = Vec::with_capacity(raw.len());

    for op in raw {
        let Some(last) = merged.pop() else {
            merged.push(op);
            continue;
        };

        match (last, op) {
            (DiffOp::Delete(old), DiffOp::Insert(new)) if !is_blank(&old) && !is_blank(&new) => {
                merged.push(DiffOp::Replace { old, new });
            }
            (DiffOp::Delete(mut prev), DiffOp::Delete(text)) => {
                prev.push_str(&text);
                merged.push(DiffOp::Delete(prev));
            }
            (DiffOp::Insert(mut prev), DiffOp::Insert(text)) => {
                prev.push_str(&text);
                merged.push(DiffOp::Insert(prev));
            }
            (last, op) => {
                merged.push(last);
                merged.push(op);
            }
        }
    }

    merged
}
