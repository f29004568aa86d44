use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for fxbundle
#[derive(Debug)]
pub struct Args {
    /// Stream task and archiver output
    pub verbose: bool,

    /// Resource directory to bundle
    pub path: Option<PathBuf>,

    /// Explicit bundler config file
    pub config: Option<PathBuf>,

    /// Version cache file
    pub cache: Option<PathBuf>,

    /// Archiver program
    pub archiver: String,

    /// Skip configured tasks
    pub no_build: bool,

    /// Build the zip in-process instead of calling the archiver
    pub native: bool,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            cache: matches.get_one::<String>("cache").map(PathBuf::from),
            archiver: matches
                .get_one::<String>("archiver")
                .cloned()
                .unwrap_or_else(|| "7z".to_string()),
            no_build: matches.get_flag("no-build"),
            native: matches.get_flag("native"),
        }
    }
}

fn command() -> Command {
    Command::new("fxbundle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bundle a FiveM resource directory into a zip archive")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show output of tasks and the archiver"),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("DIR")
                .help("Resource directory to bundle (defaults to the current directory)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Bundler config file, relative to the resource directory (defaults to bundler.config.toml, then bundler.config.json)"),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .value_name("FILE")
                .env("FXBUNDLE_CACHE")
                .help("Version cache file (defaults to data.json next to the executable)"),
        )
        .arg(
            Arg::new("archiver")
                .long("archiver")
                .value_name("PROGRAM")
                .env("FXBUNDLE_ARCHIVER")
                .default_value("7z")
                .help("Archiver invoked as `<PROGRAM> a <name>.zip -x!<pattern>...`"),
        )
        .arg(
            Arg::new("no-build")
                .long("no-build")
                .action(ArgAction::SetTrue)
                .help("Skip the configured tasks"),
        )
        .arg(
            Arg::new("native")
                .long("native")
                .action(ArgAction::SetTrue)
                .help("Create the zip in-process instead of calling the archiver"),
        )
}
