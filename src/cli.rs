// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines global app/credential flags and one subcommand per deployment action.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftoff")]
#[command(about = "Restart, migrate and inspect Heroku apps")]
#[command(version)]
pub struct Cli {
    /// Heroku app name (overrides `app` in liftoff.yml)
    #[arg(short, long, global = true)]
    pub app: Option<String>,

    /// API key (otherwise config, HEROKU_API_KEY, then ~/.netrc)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Path to a config file (default: discover liftoff.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Restart all processes
    Restart,

    /// Turn maintenance mode on or off
    Maintenance {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Run database migrations and wait for them to finish
    Migrate,

    /// Run a one-off task (e.g. `rake cache:clear`)
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        task: Vec<String>,
    },

    /// Print the app URL
    Url,

    /// Print the commit of the latest release
    LastCommit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}
