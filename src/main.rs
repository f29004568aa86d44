mod archive;
mod args;
mod cache;
mod cmd;
mod config;
mod context;
mod error;
mod fxmanifest;
mod platform;
mod result;
mod tasks;
mod tpl;
mod utils;

use args::Args;
use cache::{Cache, Opened, VersionStatus};
use config::Config;
use context::Context;
use error::Error;
use fxmanifest::Manifest;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        path,
        config,
        cache,
        archiver,
        no_build,
        native,
    } = Args::parse();

    let project_dir = utils::find_project_dir(path.as_deref())?;
    let cache_path = match cache {
        Some(cache) => cache,
        None => utils::default_cache_path()?,
    };

    let ctx = Context::new(project_dir, cache_path, verbose)
        .with_config(config)
        .with_archiver(archiver);

    cliclack::intro("fxbundle")?;

    let Opened {
        mut cache,
        recovered,
    } = Cache::open(&ctx.cache_path)?;
    if let Some(err) = recovered {
        cliclack::log::warning("Your data.json file for fxbundle seems to be invalid")?;
        verbose_log(&ctx, &err)?;
    }

    let Some(config) = load_config(&ctx)? else {
        cliclack::outro_cancel("Nothing was bundled")?;
        return Ok(());
    };

    let manifest = Manifest::load(&ctx)?;

    if let Some(version) = &manifest.version {
        match cache.record_version(&ctx.project_key(), version) {
            VersionStatus::Unchanged => {
                cliclack::log::warning("Dont forget to update the resource version")?;
            }
            VersionStatus::Changed { previous } => {
                verbose_log(&ctx, format!("Version {} -> {}", previous, version))?;
            }
            VersionStatus::New => {}
        }
    }

    if manifest.dev_ui_page {
        cliclack::log::warning("Dont forget to remove/comment out the localhost ui_page!!")?;
    }

    cache.save()?;

    if !no_build && !config.tasks.is_empty() {
        let tasks = tasks::expand(&config, manifest.version.as_deref());
        step(&ctx, "Running tasks...", "Tasks completed", || {
            tasks::run(&ctx, &tasks)
        })?;
    }

    let archive_path = step(
        &ctx,
        &format!("Creating {}...", config.archive_filename()),
        "Archive created",
        || {
            if native {
                archive::create_native(&ctx, &config)
            } else {
                archive::create(&ctx, &config)
            }
        },
    )?;

    cliclack::log::success("Successfully bundled files")?;
    cliclack::outro(format!("Created {}", archive_path.display()))?;
    Ok(())
}

/// Resolve the bundler config. `None` means bundling is skipped for this run.
fn load_config(ctx: &Context) -> result::Result<Option<Config>> {
    let (config, rejected) = Config::discover(&ctx.config_candidates());

    for candidate in &rejected {
        verbose_log(
            ctx,
            format!("Skipped {}: {}", candidate.path.display(), candidate.error),
        )?;
    }

    match config {
        Ok(config) => Ok(Some(config)),
        Err(err) => {
            let invalid = rejected
                .iter()
                .find(|c| matches!(c.error, Error::InvalidConfig { .. }));

            match invalid {
                Some(candidate) => {
                    cliclack::log::warning(format!("Bundler config is invalid: {}", candidate.error))?
                }
                None => {
                    cliclack::log::warning("Could not find the bundler config file")?;
                    verbose_log(ctx, &err)?;
                }
            }

            Ok(None)
        }
    }
}

/// Run a step behind a spinner, or announce it and let command output stream
/// through in verbose mode
fn step<T>(
    ctx: &Context,
    start: &str,
    done: &str,
    f: impl FnOnce() -> result::Result<T>,
) -> result::Result<T> {
    if ctx.verbose {
        cliclack::log::info(start)?;
        return f();
    }

    let spinner = cliclack::spinner();
    spinner.start(start);
    match f() {
        Ok(value) => {
            spinner.stop(done);
            Ok(value)
        }
        Err(e) => {
            spinner.error(start.trim_end_matches("..."));
            Err(e)
        }
    }
}

fn verbose_log(ctx: &Context, msg: impl std::fmt::Display) -> result::Result<()> {
    if ctx.verbose {
        cliclack::log::remark(msg)?;
    }
    Ok(())
}
