use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use weather_core::{Config, ConfigStore, FileStore};

use crate::{dispatcher::Dispatcher, input, render, setup};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Interactive weather client with favourite locations")]
pub struct Cli {
    /// Configuration file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let store = match self.config {
            Some(path) => FileStore::new(path),
            None => FileStore::default_location()?,
        };

        let mut config = open_config(&store)?;
        let provider = setup::provider(&mut config, &store)?;
        tracing::info!(
            path = %store.path().display(),
            favourites = config.favourites.len(),
            "configuration loaded"
        );

        let mut stdout = io::stdout();
        render::help(&mut stdout)?;

        let input = input::spawn_reader(io::BufReader::new(io::stdin()))
            .context("Failed to start input reader")?;

        Dispatcher::new(config, store, provider, stdout).run(input).await
    }
}

/// Load the config, writing the defaults out on first run.
///
/// Failing to create the file is not fatal: the session starts with an
/// empty favourites list and the next save reports its own error.
fn open_config(store: &FileStore) -> anyhow::Result<Config> {
    let first_run = !store.exists();
    let config = store.load()?;

    if first_run {
        match store.save(&config).context("Failed to create config file") {
            Ok(()) => println!("New config file created at {}", store.path().display()),
            Err(err) => tracing::warn!(error = %format!("{err:#}"), "continuing without a config file"),
        }
    }

    Ok(config)
}
