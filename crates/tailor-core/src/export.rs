//! Export variants to a directory tree and import them back

use crate::school::is_valid_school_name;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File written inside each school's directory
pub const VARIANT_FILE_NAME: &str = "personal_statement.txt";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export root {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("Invalid school name for a directory: {0:?}")]
    InvalidSchoolName(String),
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A chosen export directory holding one sub-directory per school
#[derive(Debug, Clone)]
pub struct ExportRoot {
    root: PathBuf,
}

impl ExportRoot {
    /// Use an existing directory as the export root
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let root = path.into();
        if !root.is_dir() {
            return Err(ExportError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `<root>/<school>/personal_statement.txt`
    pub fn write_variant(&self, school: &str, content: &str) -> Result<PathBuf, ExportError> {
        if !is_valid_school_name(school) {
            return Err(ExportError::InvalidSchoolName(school.to_string()));
        }
        let dir = self.root.join(school);
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;
        let file = dir.join(VARIANT_FILE_NAME);
        fs::write(&file, content).map_err(|source| ExportError::Io {
            path: file.clone(),
            source,
        })?;
        info!("Exported variant for {:?} to {:?}", school, file);
        Ok(file)
    }

    /// Read every `<school>/personal_statement.txt` under the root.
    ///
    /// Entries that are not directories, or directories without the file,
    /// are skipped.
    pub fn import_all(&self) -> Result<BTreeMap<String, String>, ExportError> {
        let entries = fs::read_dir(&self.root).map_err(|source| ExportError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut result = BTreeMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 directory {:?}", path);
                continue;
            };
            match fs::read_to_string(path.join(VARIANT_FILE_NAME)) {
                Ok(text) => {
                    result.insert(name, text);
                }
                Err(e) => debug!("Skipping {:?}: {}", path, e),
            }
        }
        info!("Imported {} variants from {:?}", result.len(), self.root);
        Ok(result)
    }
}
