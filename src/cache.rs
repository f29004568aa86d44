use crate::result::Result;
use crate::utils;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of comparing a manifest version against the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    New,
    Unchanged,
    Changed { previous: String },
}

/// On-disk record of the last bundled version per project directory.
/// Entries are kept as raw JSON so records this tool does not understand
/// survive a save untouched.
#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    records: Map<String, Value>,
}

/// Result of opening the cache. A corrupt file is not fatal; the error is
/// handed back so the caller can report it.
pub struct Opened {
    pub cache: Cache,
    pub recovered: Option<crate::error::Error>,
}

impl Cache {
    /// Open the cache file, creating it as `{}` when missing.
    pub fn open(path: &Path) -> Result<Opened> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                utils::ensure_dir(parent)?;
            }
            fs::write(path, "{}")?;
        }

        let (records, recovered) = match Self::read(path) {
            Ok(records) => (records, None),
            Err(err) => (Map::new(), Some(err)),
        };

        Ok(Opened {
            cache: Cache {
                path: path.to_path_buf(),
                records,
            },
            recovered,
        })
    }

    /// Only an unreadable file or a top-level value that is not an object is
    /// treated as corrupt.
    fn read(path: &Path) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Store `version` for `project`, reporting how it relates to the
    /// previously recorded one. The value is stored even when unchanged.
    pub fn record_version(&mut self, project: &str, version: &str) -> VersionStatus {
        let previous = self
            .records
            .get(project)
            .and_then(|record| record.get("version"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let current = Value::String(version.to_string());
        match self.records.get_mut(project) {
            Some(Value::Object(record)) => {
                record.insert("version".to_string(), current);
            }
            _ => {
                let mut record = Map::new();
                record.insert("version".to_string(), current);
                self.records.insert(project.to_string(), Value::Object(record));
            }
        }

        match previous {
            None => VersionStatus::New,
            Some(previous) if previous == version => VersionStatus::Unchanged,
            Some(previous) => VersionStatus::Changed { previous },
        }
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, serde_json::to_string(&self.records)?)?;
        Ok(())
    }
}
