use std::path::{Path, PathBuf};

/// Name of the resource manifest every project carries at its root
pub const MANIFEST_FILE: &str = "fxmanifest.lua";

/// Config files looked up in the project directory, in order of preference
pub const CONFIG_CANDIDATES: &[&str] = &["bundler.config.toml", "bundler.config.json"];

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Stream external command output and print recoverable error details
    pub verbose: bool,

    /// Resource directory being bundled (absolute)
    pub project_dir: PathBuf,

    /// Location of the version cache (data.json)
    pub cache_path: PathBuf,

    /// Explicit config file, replaces the candidate lookup when set
    pub config_path: Option<PathBuf>,

    /// Program invoked to produce the archive
    pub archiver: String,
}

impl Context {
    pub fn new(project_dir: PathBuf, cache_path: PathBuf, verbose: bool) -> Self {
        Self {
            verbose,
            project_dir,
            cache_path,
            config_path: None,
            archiver: "7z".to_string(),
        }
    }

    pub fn with_config(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path.map(|p| self.resolve(&p));
        self
    }

    pub fn with_archiver<T: Into<String>>(mut self, archiver: T) -> Self {
        self.archiver = archiver.into();
        self
    }

    /// Config files to try, in order
    pub fn config_candidates(&self) -> Vec<PathBuf> {
        match &self.config_path {
            Some(path) => vec![path.clone()],
            None => CONFIG_CANDIDATES
                .iter()
                .map(|name| self.project_dir.join(name))
                .collect(),
        }
    }

    /// Explicit config file as an archive-relative path, when it lives inside
    /// the project directory
    pub fn config_exclusion(&self) -> Option<String> {
        let path = self.config_path.as_ref()?;
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        let relative = path.strip_prefix(&self.project_dir).ok()?;

        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        (!name.is_empty()).then_some(name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(MANIFEST_FILE)
    }

    /// Cache key identifying this project
    pub fn project_key(&self) -> String {
        self.project_dir.display().to_string()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidates_in_order() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false);
        assert_eq!(
            ctx.config_candidates(),
            vec![
                PathBuf::from("/srv/res/bundler.config.toml"),
                PathBuf::from("/srv/res/bundler.config.json"),
            ]
        );
    }

    #[test]
    fn test_config_exclusion_inside_project() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false)
            .with_config(Some(PathBuf::from("conf/custom.toml")));
        assert_eq!(ctx.config_exclusion().as_deref(), Some("conf/custom.toml"));
    }

    #[test]
    fn test_config_exclusion_outside_project() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false)
            .with_config(Some(PathBuf::from("/etc/fxbundle/custom.toml")));
        assert!(ctx.config_exclusion().is_none());

        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false);
        assert!(ctx.config_exclusion().is_none());
    }

    #[test]
    fn test_explicit_config_replaces_candidates() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false)
            .with_config(Some(PathBuf::from("custom.toml")));
        assert_eq!(ctx.config_candidates(), vec![PathBuf::from("/srv/res/custom.toml")]);
    }
}
