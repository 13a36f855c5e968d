//! Store-only ZIP packaging of exported variants

use crate::export::VARIANT_FILE_NAME;
use crate::school::is_valid_school_name;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Entry path {0:?} would escape the archive root")]
    UnsafePath(String),
}

/// One file inside the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, `/`-separated
    pub path: String,
    pub content: String,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Map each school's variant to `<school>/personal_statement.txt`
pub fn variant_entries(
    variants: &BTreeMap<String, String>,
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    variants
        .iter()
        .map(|(school, text)| {
            let path = format!("{}/{}", school, VARIANT_FILE_NAME);
            if !is_valid_school_name(school) {
                return Err(ArchiveError::UnsafePath(path));
            }
            Ok(ArchiveEntry::new(path, text))
        })
        .collect()
}

/// Relative and free of `.`, `..` and empty components, so extraction stays
/// under the target directory
fn is_enclosed(path: &str) -> bool {
    !path.is_empty()
        && !path.contains(['\\', '\0'])
        && path
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..")
}

/// Build an uncompressed ZIP archive in memory
pub fn build_zip(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in entries {
        if !is_enclosed(&entry.path) {
            return Err(ArchiveError::UnsafePath(entry.path.clone()));
        }
        writer.start_file(entry.path.as_str(), options)?;
        writer.write_all(entry.content.as_bytes())?;
    }

    let bytes = writer.finish()?.into_inner();
    info!("Built archive with {} entries ({} bytes)", entries.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_variant_entries_paths() {
        let mut variants = BTreeMap::new();
        variants.insert("Yale".to_string(), "y".to_string());
        variants.insert("Brown".to_string(), "b".to_string());

        let entries = variant_entries(&variants).unwrap();
        assert_eq!(
            entries,
            vec![
                ArchiveEntry::new("Brown/personal_statement.txt", "b"),
                ArchiveEntry::new("Yale/personal_statement.txt", "y"),
            ]
        );
    }

    #[test]
    fn test_build_zip_is_stored_and_readable() {
        let entries = vec![
            ArchiveEntry::new("Yale/personal_statement.txt", "Dear Yale"),
            ArchiveEntry::new("Brown/personal_statement.txt", "Dear Brown ☕"),
        ];
        let bytes = build_zip(&entries).unwrap();
        assert_eq!(&bytes[..4], &[0x50, 0x4b, 0x03, 0x04]);

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for expected in &entries {
            let mut file = archive.by_name(&expected.path).unwrap();
            assert_eq!(file.compression(), CompressionMethod::Stored);
            assert!(file.enclosed_name().is_some());
            let mut text = String::new();
            file.read_to_string(&mut text).unwrap();
            assert_eq!(text, expected.content);
        }
    }

    #[test]
    fn test_variant_entries_reject_traversal() {
        for school in ["..", "a/b", ".", "..\\up"] {
            let mut variants = BTreeMap::new();
            variants.insert("Rice".to_string(), "r".to_string());
            variants.insert(school.to_string(), "x".to_string());
            assert!(
                matches!(
                    variant_entries(&variants),
                    Err(ArchiveError::UnsafePath(_))
                ),
                "{:?} should be rejected",
                school
            );
        }
    }

    #[test]
    fn test_build_zip_rejects_escaping_paths() {
        for path in [
            "../personal_statement.txt",
            "/etc/personal_statement.txt",
            "a/../../b.txt",
            "a//b.txt",
            "",
        ] {
            let entries = vec![ArchiveEntry::new(path, "x")];
            assert!(
                matches!(build_zip(&entries), Err(ArchiveError::UnsafePath(_))),
                "{:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build_zip(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
