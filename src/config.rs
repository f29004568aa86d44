use crate::error::Error;
use crate::result::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Bundler configuration as written in `bundler.config.toml` / `.json`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Archive name, produces `<name>.zip`
    pub name: String,

    /// Shell commands run before archiving
    #[serde(default)]
    pub tasks: Vec<String>,

    /// Paths excluded from the archive, in addition to the global list
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// A config candidate that could not be used
#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub error: Error,
}

impl Config {
    /// Load and validate a single config file. The format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        // A candidate that exists but cannot be read is invalid, not missing
        let content = fs::read_to_string(path).map_err(|e| {
            if path.exists() {
                Error::invalid_config(path, e.to_string())
            } else {
                Error::from(e)
            }
        })?;

        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| Error::invalid_config(path, e.message()))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| Error::invalid_config(path, e.to_string()))?,
            _ => {
                return Err(Error::invalid_config(
                    path,
                    "unsupported config format (expected .toml or .json)",
                ));
            }
        };

        config.validate(path)?;
        Ok(config)
    }

    /// Try each candidate in order; the first existing and valid one wins.
    /// Candidates that were skipped are returned alongside for reporting.
    pub fn discover(candidates: &[PathBuf]) -> (Result<Self>, Vec<Rejected>) {
        let mut rejected = Vec::new();

        for path in candidates {
            match Self::load(path) {
                Ok(config) => return (Ok(config), rejected),
                Err(error) => rejected.push(Rejected {
                    path: path.clone(),
                    error,
                }),
            }
        }

        let tried = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        (Err(Error::ConfigNotFound(tried)), rejected)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_config(path, "`name` must not be empty"));
        }

        if self.name.contains(['/', '\\']) {
            return Err(Error::invalid_config(
                path,
                format!("`name` must not contain a path separator: {}", self.name),
            ));
        }

        Ok(())
    }

    /// File name of the produced archive
    pub fn archive_filename(&self) -> String {
        format!("{}.zip", self.name)
    }
}
