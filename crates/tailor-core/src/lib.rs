//! Tailor Core - Word and character level diff engine with variant storage
//!
//! This library computes edit scripts between a template and a generated
//! variant, renders them as markup, and provides the storage, generation,
//! export and packaging pieces used by the `tailor` CLI.

pub mod archive;
pub mod change;
pub mod diff;
pub mod export;
pub mod generate;
pub mod lcs;
pub mod merge;
pub mod refine;
pub mod render;
pub mod school;
pub mod storage;
pub mod token;

pub use archive::{build_zip, variant_entries, ArchiveEntry, ArchiveError};
pub use change::{ChangeKind, CharPart, DiffOp, RefinedOp};
pub use diff::{diff, DiffEngine, DiffError, DiffResult};
pub use export::{ExportError, ExportRoot, VARIANT_FILE_NAME};
pub use generate::{
    GenerateError, Generator, GeneratorKind, LocalGenerator, RemoteGenerator, PLACEHOLDER,
};
pub use lcs::{backtrack, diff_slices, Edit, LcsTable};
pub use merge::merge_ops;
pub use refine::{refine_chars, refine_ops};
pub use render::{escape_html, render_markup, render_plain};
pub use school::is_valid_school_name;
pub use storage::{StorageError, Store};
pub use token::{is_blank, tokenize, TokenKind};
