//! Resolve command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use super::utils::{settings, ResolveArgs};

#[derive(Args)]
pub struct ResolveCommand {
    #[command(flatten)]
    pub args: ResolveArgs,

    /// Print single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub fn run(root: &Path, cmd: ResolveCommand) -> Result<()> {
    let settings = settings(root)?;
    let options = cmd.args.options(&settings);
    let resolver = cmd.args.resolver(root);

    let resolved = resolver
        .resolve_options(&options)
        .with_context(|| format!("Failed resolving {}", root.join(&options.file).display()))?;

    let rendered = if cmd.compact {
        serde_json::to_string(&resolved.value)?
    } else {
        serde_json::to_string_pretty(&resolved.value)?
    };
    println!("{}", rendered);

    Ok(())
}
