use crate::cmd;
use crate::config::Config;
use crate::context::Context;
use crate::result::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Paths never shipped in a bundle, appended after the project's own ignores
pub const GLOBAL_IGNORE: &[&str] = &[
    ".git",
    ".github",
    ".vscode",
    ".idea",
    "node_modules",
    "bundler.config.toml",
    "bundler.config.json",
];

/// Project ignores followed by the global ones, order preserved
pub fn exclusions(ignore: &[String]) -> Vec<String> {
    ignore
        .iter()
        .cloned()
        .chain(GLOBAL_IGNORE.iter().map(|s| s.to_string()))
        .collect()
}

/// Everything kept out of this project's archive: [`exclusions`] plus an
/// explicit config file living inside the project
pub fn project_exclusions(ctx: &Context, config: &Config) -> Vec<String> {
    let mut excluded = exclusions(&config.ignore);
    if let Some(config_file) = ctx.config_exclusion() {
        if !excluded.contains(&config_file) {
            excluded.push(config_file);
        }
    }
    excluded
}

/// Arguments for `7z`: add everything under the working directory to the
/// archive, with one `-x!` switch per exclusion
pub fn command_args(archive_filename: &str, exclusions: &[String]) -> Vec<String> {
    let mut args = vec!["a".to_string(), archive_filename.to_string()];
    args.extend(exclusions.iter().map(|pattern| format!("-x!{}", pattern)));
    args
}

/// Remove a previous archive so the new one does not pick up stale entries
fn remove_existing(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Produce `<name>.zip` in the project directory with the external archiver
pub fn create(ctx: &Context, config: &Config) -> Result<PathBuf> {
    let filename = config.archive_filename();
    let archive_path = ctx.project_dir.join(&filename);
    remove_existing(&archive_path)?;

    let args = command_args(&filename, &project_exclusions(ctx, config));
    cmd::execute(ctx, &ctx.archiver, &args)?;

    Ok(archive_path)
}

/// Produce `<name>.zip` in-process, applying the exclusions as globs
pub fn create_native(ctx: &Context, config: &Config) -> Result<PathBuf> {
    let filename = config.archive_filename();
    let archive_path = ctx.project_dir.join(&filename);
    remove_existing(&archive_path)?;

    let excluded = build_globset(&project_exclusions(ctx, config))?;
    create_zip_file(ctx, &excluded, &archive_path)?;

    Ok(archive_path)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Relative path with `/` separators, as stored in the archive
fn entry_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_excluded(excluded: &GlobSet, relative: &Path) -> bool {
    if excluded.is_match(entry_name(relative)) {
        return true;
    }
    relative
        .file_name()
        .is_some_and(|name| excluded.is_match(name))
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

fn create_zip_file(ctx: &Context, excluded: &GlobSet, output_path: &Path) -> Result<()> {
    let source_dir = &ctx.project_dir;
    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(file);

    let walker = WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match entry.path().strip_prefix(source_dir) {
            Ok(relative) => relative.as_os_str().is_empty() || !is_excluded(excluded, relative),
            Err(_) => false,
        });

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if path == output_path {
            continue;
        }

        let relative = match path.strip_prefix(source_dir) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => continue,
        };
        let name = entry_name(relative);

        if entry.file_type().is_dir() {
            zip.add_directory(name, entry_options(0o755))?;
        } else if entry.file_type().is_file() {
            if ctx.verbose {
                println!("Adding {}", name);
            }
            zip.start_file(name, entry_options(0o644))?;
            let mut f = File::open(path)?;
            std::io::copy(&mut f, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_exclusions_merge_in_order() {
        let merged = exclusions(&["web/src".to_string(), "*.md".to_string()]);
        assert_eq!(merged[0], "web/src");
        assert_eq!(merged[1], "*.md");
        assert_eq!(merged.len(), 2 + GLOBAL_IGNORE.len());
        assert_eq!(&merged[2..], GLOBAL_IGNORE);
    }

    #[test]
    fn test_command_args_one_flag_per_exclusion() {
        let args = command_args("garage.zip", &exclusions(&["web/src".to_string()]));

        assert_eq!(&args[..3], ["a", "garage.zip", "-x!web/src"]);
        let flags: Vec<_> = args.iter().filter(|a| a.starts_with("-x!")).collect();
        assert_eq!(flags.len(), 1 + GLOBAL_IGNORE.len());
        assert_eq!(args.last().unwrap(), "-x!bundler.config.json");
    }

    #[test]
    fn test_global_ignores_apply_without_project_ignores() {
        let args = command_args("garage.zip", &exclusions(&[]));
        assert_eq!(args.len(), 2 + GLOBAL_IGNORE.len());
        assert_eq!(args[2], "-x!.git");
    }

    #[test]
    fn test_project_exclusions_add_explicit_config() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false)
            .with_config(Some(PathBuf::from("custom.toml")));
        let config = Config {
            name: "garage".to_string(),
            tasks: Vec::new(),
            ignore: vec!["web/src".to_string()],
        };

        let excluded = project_exclusions(&ctx, &config);
        assert_eq!(excluded.first().unwrap(), "web/src");
        assert_eq!(excluded.last().unwrap(), "custom.toml");
        assert_eq!(excluded.len(), 2 + GLOBAL_IGNORE.len());
    }

    #[test]
    fn test_project_exclusions_skip_default_candidates() {
        let ctx = Context::new(PathBuf::from("/srv/res"), PathBuf::from("/opt/data.json"), false)
            .with_config(Some(PathBuf::from("bundler.config.json")));
        let config = Config {
            name: "garage".to_string(),
            tasks: Vec::new(),
            ignore: Vec::new(),
        };

        assert_eq!(project_exclusions(&ctx, &config), exclusions(&[]));
    }

    #[test]
    fn test_command_args_without_exclusions() {
        assert_eq!(command_args("garage.zip", &[]), vec!["a", "garage.zip"]);
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_create_native_applies_exclusions() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "fxmanifest.lua", "version '1.0.0'");
        write(root, "client/main.lua", "print('hi')");
        write(root, "web/src/app.ts", "export {}");
        write(root, "web/dist/index.html", "<html></html>");
        write(root, "node_modules/pkg/index.js", "");
        write(root, "notes.md", "todo");
        write(root, "bundler.config.toml", "name = \"garage\"");
        write(root, "garage.zip", "stale");

        write(root, "conf/release.toml", "name = \"garage\"");

        let root = fs::canonicalize(root).unwrap();
        let root = root.as_path();
        let ctx = Context::new(root.to_path_buf(), root.join("data.json"), false)
            .with_config(Some(PathBuf::from("conf/release.toml")));
        let config = Config {
            name: "garage".to_string(),
            tasks: Vec::new(),
            ignore: vec!["web/src".to_string(), "*.md".to_string()],
        };

        let path = create_native(&ctx, &config).unwrap();
        assert_eq!(path, root.join("garage.zip"));

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        assert!(names.iter().any(|n| n == "fxmanifest.lua"));
        assert!(names.iter().any(|n| n == "client/main.lua"));
        assert!(names.iter().any(|n| n == "web/dist/index.html"));
        assert!(!names.iter().any(|n| n.starts_with("web/src")));
        assert!(!names.iter().any(|n| n.starts_with("node_modules")));
        assert!(!names.iter().any(|n| n == "notes.md"));
        assert!(!names.iter().any(|n| n == "bundler.config.toml"));
        assert!(!names.iter().any(|n| n == "garage.zip"));
        assert!(!names.iter().any(|n| n == "conf/release.toml"));

        let mut content = String::new();
        archive
            .by_name("client/main.lua")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "print('hi')");
    }

    #[cfg(unix)]
    #[test]
    fn test_create_removes_previous_archive_before_running() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "garage.zip", "stale");

        // `test -e` fails if the old archive is still there when the archiver runs
        let script = root.join("fake-7z");
        fs::write(&script, "#!/bin/sh\ntest ! -e \"$2\" && echo fresh > \"$2\"\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let ctx = Context::new(root.to_path_buf(), root.join("data.json"), false)
            .with_archiver(script.display().to_string());
        let config = Config {
            name: "garage".to_string(),
            tasks: Vec::new(),
            ignore: Vec::new(),
        };

        let path = create(&ctx, &config).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap().trim(), "fresh");
    }
}
