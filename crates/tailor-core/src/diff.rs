//! Diff computation engine

use crate::change::{ChangeKind, DiffOp, RefinedOp};
use crate::lcs::{diff_slices, Edit};
use crate::merge::merge_ops;
use crate::refine::refine_ops;
use crate::render::{render_markup, render_plain};
use crate::token::tokenize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default upper bound on the character table built for one replacement
pub const DEFAULT_MAX_REFINE_CELLS: usize = 250_000;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
}

/// Result of a diff operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Merged and refined ops in order
    pub ops: Vec<RefinedOp>,
    /// Number of ops that add content (inserts and replacements)
    pub insertions: usize,
    /// Number of ops that remove content (deletes and replacements)
    pub deletions: usize,
}

impl DiffResult {
    fn from_ops(ops: Vec<RefinedOp>) -> Self {
        let mut insertions = 0;
        let mut deletions = 0;
        for refined in &ops {
            match refined.op.kind() {
                ChangeKind::Insert => insertions += 1,
                ChangeKind::Delete => deletions += 1,
                ChangeKind::Replace => {
                    insertions += 1;
                    deletions += 1;
                }
                ChangeKind::Equal => {}
            }
        }
        Self {
            ops,
            insertions,
            deletions,
        }
    }

    /// Rebuild the original text from the ops
    pub fn old_text(&self) -> String {
        self.ops.iter().filter_map(|r| r.op.old_side()).collect()
    }

    /// Rebuild the modified text from the ops
    pub fn new_text(&self) -> String {
        self.ops.iter().filter_map(|r| r.op.new_side()).collect()
    }

    /// True when the two inputs were the same
    pub fn is_identical(&self) -> bool {
        self.ops.iter().all(|r| !r.op.is_change())
    }

    /// Only the actual changes (excluding context)
    pub fn significant(&self) -> impl Iterator<Item = &RefinedOp> {
        self.ops.iter().filter(|r| r.op.is_change())
    }

    pub fn render_markup(&self) -> String {
        render_markup(&self.ops)
    }

    pub fn render_plain(&self) -> String {
        render_plain(&self.ops)
    }
}

/// The main diff engine.
///
/// Holds only settings; every call computes from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    /// Whether to refine replacements at character level
    char_refinement: bool,
    /// Largest character table a single replacement may use
    max_refine_cells: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self {
            char_refinement: true,
            max_refine_cells: DEFAULT_MAX_REFINE_CELLS,
        }
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_char_refinement(mut self, enabled: bool) -> Self {
        self.char_refinement = enabled;
        self
    }

    pub fn with_max_refine_cells(mut self, cells: usize) -> Self {
        self.max_refine_cells = cells;
        self
    }

    /// Compute the raw token edit script, before merging
    pub fn token_ops(&self, old: &str, new: &str) -> Vec<DiffOp> {
        let old_tokens = tokenize(old);
        let new_tokens = tokenize(new);
        debug!(
            old_tokens = old_tokens.len(),
            new_tokens = new_tokens.len(),
            "Diffing token sequences"
        );

        diff_slices(&old_tokens, &new_tokens, |a, b| a == b)
            .into_iter()
            .map(|edit| match edit {
                Edit::Equal { old, .. } => DiffOp::Equal(old_tokens[old].to_string()),
                Edit::Delete { old } => DiffOp::Delete(old_tokens[old].to_string()),
                Edit::Insert { new } => DiffOp::Insert(new_tokens[new].to_string()),
            })
            .collect()
    }

    /// Compute diff between two strings
    pub fn diff_strings(&self, old: &str, new: &str) -> DiffResult {
        let merged = merge_ops(self.token_ops(old, new));
        let ops = if self.char_refinement {
            refine_ops(merged, self.max_refine_cells)
        } else {
            merged.into_iter().map(RefinedOp::new).collect()
        };
        DiffResult::from_ops(ops)
    }

    /// Compute diff between two files
    pub fn diff_files(&self, old_path: &Path, new_path: &Path) -> Result<DiffResult, DiffError> {
        let old_content = std::fs::read_to_string(old_path)?;
        let new_content = std::fs::read_to_string(new_path)?;

        Ok(self.diff_strings(&old_content, &new_content))
    }
}

/// Diff two strings with the default engine
pub fn diff(old: &str, new: &str) -> DiffResult {
    DiffEngine::new().diff_strings(old, new)
}
