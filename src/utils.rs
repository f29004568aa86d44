use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the project directory from the given path or the current directory
pub fn find_project_dir(path: Option<&Path>) -> Result<PathBuf> {
    let base_path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !base_path.is_dir() {
        return Err(Error::custom(format!(
            "Project directory not found: {}",
            base_path.display()
        )));
    }

    Ok(fs::canonicalize(&base_path)?)
}

/// Default cache location: data.json next to the installed executable
pub fn default_cache_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(dir.join("data.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
