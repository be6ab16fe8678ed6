// ABOUTME: Entry point for the liftoff CLI application.
// ABOUTME: Loads config, builds the wrapper, and dispatches the requested action.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, Toggle};
use liftoff::config::Config;
use liftoff::error::{Error, Result};
use liftoff::types::AppName;
use liftoff::{HerokuWrapper, WrapperOptions};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover_or_default(&env::current_dir()?)?,
    };

    let app = match cli.app.as_deref() {
        Some(name) => AppName::new(name).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => config.app.clone().ok_or(Error::MissingApp)?,
    };

    let wrapper = HerokuWrapper::new(app, options(&cli, &config)?)?;

    match cli.command {
        Commands::Restart => wrapper.app_restart().await?,
        Commands::Maintenance { state: Toggle::On } => wrapper.app_maintenance_on().await?,
        Commands::Maintenance { state: Toggle::Off } => wrapper.app_maintenance_off().await?,
        Commands::Migrate => wrapper.run_migrations().await?,
        Commands::Run { task } => wrapper.run_task(&task.join(" ")).await?,
        Commands::Url => println!("{}", wrapper.app_url().await?),
        Commands::LastCommit => {
            if let Some(commit) = wrapper.last_deploy_commit().await? {
                println!("{commit}");
            }
        }
    }

    Ok(())
}

/// The --api-key flag wins over any key in the config file.
fn options(cli: &Cli, config: &Config) -> Result<WrapperOptions> {
    match &cli.api_key {
        Some(key) => Ok(WrapperOptions::new()
            .api_config(config.api_config())
            .rendezvous_config(config.rendezvous_config())
            .api_key(key.clone())),
        None => config.wrapper_options(),
    }
}
