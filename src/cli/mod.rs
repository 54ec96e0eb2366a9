//! Command-line interface for sitecfg
//!
//! Provides `resolve`, `lock` and `completions` subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod lock;
mod resolve;
mod utils;

/// Resolve site- and environment-specific build configs
#[derive(Parser)]
#[command(name = "sitecfg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory holding config.json (defaults to the current directory)
    #[arg(short = 'C', long, global = true, env = "SITECFG_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved config as JSON
    Resolve(resolve::ResolveCommand),

    /// Resolve the config and write the lock file if it changed
    Lock(lock::LockCommand),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Resolve(args) => resolve::run(&root, args),
        Commands::Lock(args) => lock::run(&root, args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sitecfg", &mut std::io::stdout());
            Ok(())
        }
    }
}
