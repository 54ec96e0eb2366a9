//! Lock command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::{Path, PathBuf};

use super::utils::{settings, ResolveArgs};
use crate::{LockAction, Session};

#[derive(Args)]
pub struct LockCommand {
    #[command(flatten)]
    pub args: ResolveArgs,

    /// Lock file to write (default: config.lock)
    #[arg(short, long, value_name = "FILE")]
    pub lock: Option<PathBuf>,

    /// Rewrite the lock file even if nothing changed
    #[arg(long)]
    pub force: bool,

    /// Also print the resolved config
    #[arg(long)]
    pub print: bool,
}

pub fn run(root: &Path, cmd: LockCommand) -> Result<()> {
    let settings = settings(root)?;
    let options = cmd.args.options(&settings);
    let lock_file = cmd.lock.clone().unwrap_or_else(|| settings.lock.clone());
    let file = root.join(&options.file);

    let mut session = Session::new(cmd.args.resolver(root)).with_lock_file(&lock_file);
    let persisted = if cmd.force {
        session.recreate(options)
    } else {
        session.create(Some(options.into()))
    }
    .with_context(|| format!("Failed resolving {}", file.display()))?;

    if cmd.print {
        println!("{}", serde_json::to_string_pretty(&persisted.resolved.value)?);
    }

    if let Some(err) = persisted.write_error {
        return Err(err).context("Lock file was not written");
    }

    let label = match persisted.action {
        LockAction::Created => style(persisted.action.as_str()).green(),
        LockAction::Updated | LockAction::Recreated => style(persisted.action.as_str()).yellow(),
        LockAction::Unchanged => style(persisted.action.as_str()).dim(),
    };
    println!("{}: {}", label, lock_file.display());

    Ok(())
}
