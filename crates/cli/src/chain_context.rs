//! Loader chain assembly from CLI flags.
//!
//! Responsibilities:
//! - Translate `ChainArgs` into a `Loaders` chain in the standard precedence
//!   order: command line, environment, env file, INI file.
//!
//! Does NOT handle:
//! - Resolution or casting (see `commands::get`).
//! - CLI argument definitions (see `args` module).
//!
//! Invariants:
//! - `--config` values go through the library's own command-line loader, so
//!   malformed tokens are skipped exactly as they would be in-process.
//! - With no file flags the env file and INI file loaders keep their defaults
//!   (`.env` and `setup.cfg` in the working directory).

use anyhow::{Context, Result};
use confchain::constants::CONFIG_ARG_ID;
use confchain::{
    CommandLine, Configuration, EnvFile, Environment, FileSource, IniFile, Loaders,
    RecursiveFileSearchSource,
};

use crate::args::ChainArgs;

pub(crate) fn build_loaders(args: &ChainArgs) -> Result<Loaders> {
    let mut loaders = Loaders::empty();

    let flag = format!("--{}", CONFIG_ARG_ID);
    let argv = std::iter::once("confchain".to_string()).chain(
        args.config
            .iter()
            .flat_map(|pair| [flag.clone(), pair.clone()]),
    );
    loaders.push(CommandLine::from_args(argv));

    if !args.no_env {
        loaders.push(Environment::new());
    }

    let env_file = if !args.env_files.is_empty() {
        EnvFile::new().with_source(FileSource::new(args.env_files.iter().cloned()))
    } else if !args.search.is_empty() {
        let search = RecursiveFileSearchSource::with_root(&args.search, &args.start, &args.root)
            .with_context(|| {
                format!(
                    "Failed to set up env file search from {}",
                    args.start.display()
                )
            })?;
        EnvFile::new().with_source(search)
    } else {
        EnvFile::new()
    };
    loaders.push(env_file);

    let ini_file = match &args.ini {
        Some(path) => IniFile::new().with_filename(path),
        None => IniFile::new(),
    };
    loaders.push(ini_file.with_section(&args.section));

    tracing::debug!(loaders = loaders.len(), "Assembled loader chain");
    Ok(loaders)
}

pub(crate) fn build_configuration(args: &ChainArgs) -> Result<Configuration> {
    Ok(Configuration::new(build_loaders(args)?))
}
