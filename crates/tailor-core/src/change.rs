//! Edit operations produced by the diff pipeline

use serde::{Deserialize, Serialize};

/// The kind of an edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Content was added
    Insert,
    /// Content was removed
    Delete,
    /// A non-whitespace span was substituted by another
    Replace,
    /// Content is unchanged
    Equal,
}

/// A token-level operation carrying the literal text it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DiffOp {
    /// Text present in both versions
    Equal(String),
    /// Text only in the original
    Delete(String),
    /// Text only in the modified version
    Insert(String),
    /// Original text `old` became `new`
    Replace { old: String, new: String },
}

impl DiffOp {
    pub fn kind(&self) -> ChangeKind {
        match self {
            DiffOp::Equal(_) => ChangeKind::Equal,
            DiffOp::Delete(_) => ChangeKind::Delete,
            DiffOp::Insert(_) => ChangeKind::Insert,
            DiffOp::Replace { .. } => ChangeKind::Replace,
        }
    }

    /// The part of the original string this op accounts for
    pub fn old_side(&self) -> Option<&str> {
        match self {
            DiffOp::Equal(text) | DiffOp::Delete(text) => Some(text.as_str()),
            DiffOp::Replace { old, .. } => Some(old.as_str()),
            DiffOp::Insert(_) => None,
        }
    }

    /// The part of the modified string this op accounts for
    pub fn new_side(&self) -> Option<&str> {
        match self {
            DiffOp::Equal(text) | DiffOp::Insert(text) => Some(text.as_str()),
            DiffOp::Replace { new, .. } => Some(new.as_str()),
            DiffOp::Delete(_) => None,
        }
    }

    /// Check if this is an actual change (not just context)
    pub fn is_change(&self) -> bool {
        self.kind() != ChangeKind::Equal
    }
}

/// A single character inside a refined replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ch", rename_all = "lowercase")]
pub enum CharPart {
    Equal(char),
    Delete(char),
    Insert(char),
}

impl CharPart {
    pub fn kind(&self) -> ChangeKind {
        match self {
            CharPart::Equal(_) => ChangeKind::Equal,
            CharPart::Delete(_) => ChangeKind::Delete,
            CharPart::Insert(_) => ChangeKind::Insert,
        }
    }

    pub fn ch(&self) -> char {
        match *self {
            CharPart::Equal(ch) | CharPart::Delete(ch) | CharPart::Insert(ch) => ch,
        }
    }
}

/// An operation together with its character-level breakdown.
///
/// `parts` is only populated for [`DiffOp::Replace`] once refinement has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedOp {
    pub op: DiffOp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<CharPart>,
}

impl RefinedOp {
    pub fn new(op: DiffOp) -> Self {
        Self {
            op,
            parts: Vec::new(),
        }
    }

    pub fn with_parts(mut self, parts: Vec<CharPart>) -> Self {
        self.parts = parts;
        self
    }
}

impl From<DiffOp> for RefinedOp {
    fn from(op: DiffOp) -> Self {
        Self::new(op)
    }
}
