use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::fs;

/// The parts of `fxmanifest.lua` the bundler cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: Option<String>,
    pub dev_ui_page: bool,
}

impl Manifest {
    /// Read and scan the manifest in the project directory
    pub fn load(ctx: &Context) -> Result<Self> {
        let path = ctx.manifest_path();
        if !path.is_file() {
            return Err(Error::ManifestNotFound(path.display().to_string()));
        }

        let text = fs::read_to_string(&path)?;
        Ok(Self::scan(&text))
    }

    pub fn scan(text: &str) -> Self {
        Self {
            version: extract_version(text),
            dev_ui_page: contains_dev_ui_page(text),
        }
    }
}

/// Extract the quoted value of the first `version` entry.
///
/// `fx_version` is dropped first so it is not mistaken for the resource
/// version. Only the rest of the line holding the match is considered; a single
/// quote anywhere on it selects `'` as the delimiter, `"` otherwise.
pub fn extract_version(text: &str) -> Option<String> {
    let text = text.replacen("fx_version", "", 1);
    let idx = text.find("version")?;
    let line = text[idx..].split(['\r', '\n']).next()?;

    let quote = if line.contains('\'') { '\'' } else { '"' };
    line.split(quote).nth(1).map(str::to_string)
}

/// True when an uncommented `ui_page` line points at localhost
pub fn contains_dev_ui_page(text: &str) -> bool {
    text.lines()
        .flat_map(|line| line.split('\r'))
        .filter(|line| line.contains("ui_page"))
        .any(|line| !line.contains("--") && line.contains("localhost"))
}
