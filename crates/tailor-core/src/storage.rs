//! Local key-value store for the template, school list and variants

use crate::school::is_valid_school_name;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const KEY_TEMPLATE: &str = "ps_template_v1";
pub const KEY_SCHOOLS: &str = "ps_schools_v1";
const VARIANT_PREFIX: &str = "ps_variant_v1:";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access store at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Store at {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid school name: {0:?}")]
    InvalidSchoolName(String),
    #[error("Failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String keys to string values, persisted as one JSON object.
///
/// Every mutation writes the whole file back.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Store {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        info!("Opened store at {:?} ({} keys)", path, entries.len());
        Ok(Self { path, entries })
    }

    /// `<data dir>/tailor/store.json`, if the platform has a data dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("tailor").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<bool, StorageError> {
        if self.entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// The stored template, or an empty string
    pub fn template(&self) -> String {
        self.get(KEY_TEMPLATE).unwrap_or_default().to_string()
    }

    pub fn set_template(&mut self, text: &str) -> Result<(), StorageError> {
        self.set(KEY_TEMPLATE, text)
    }

    /// The school list. Anything other than a JSON array of strings reads as empty.
    pub fn schools(&self) -> Vec<String> {
        let Some(raw) = self.get(KEY_SCHOOLS) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => list,
            Err(e) => {
                warn!("Ignoring malformed school list: {}", e);
                Vec::new()
            }
        }
    }

    fn set_schools(&mut self, list: &[String]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(list)?;
        self.set(KEY_SCHOOLS, raw)
    }

    /// Add a school by trimmed name. Returns false for blank names and duplicates.
    ///
    /// Names that could not serve as a single directory name are rejected.
    pub fn add_school(&mut self, name: &str) -> Result<bool, StorageError> {
        let clean = name.trim();
        if clean.is_empty() {
            return Ok(false);
        }
        if !is_valid_school_name(clean) {
            return Err(StorageError::InvalidSchoolName(clean.to_string()));
        }
        let mut list = self.schools();
        if list.iter().any(|s| s == clean) {
            return Ok(false);
        }
        list.push(clean.to_string());
        self.set_schools(&list)?;
        info!("Added school {:?}", clean);
        Ok(true)
    }

    /// Remove a school and its stored variant
    pub fn remove_school(&mut self, name: &str) -> Result<bool, StorageError> {
        let mut list = self.schools();
        let before = list.len();
        list.retain(|s| s != name);
        let removed = list.len() != before;
        if removed {
            self.set_schools(&list)?;
            info!("Removed school {:?}", name);
        }
        let had_variant = self.remove(&variant_key(name))?;
        Ok(removed || had_variant)
    }

    pub fn variant(&self, school: &str) -> Option<&str> {
        self.get(&variant_key(school))
    }

    pub fn set_variant(&mut self, school: &str, text: &str) -> Result<(), StorageError> {
        self.set(&variant_key(school), text)
    }

    /// All stored variants keyed by school name
    pub fn variants(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(VARIANT_PREFIX)
                    .map(|school| (school.to_string(), value.clone()))
            })
            .collect()
    }
}

fn variant_key(school: &str) -> String {
    format!("{}{}", VARIANT_PREFIX, school)
}
