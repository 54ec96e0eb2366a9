//! Shared CLI options.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{load_settings, ToolSettings};
use crate::{ConfigResolver, FlagSet, PlaceholderPolicy, ResolveOptions};

/// Options shared by `resolve` and `lock`.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Base config file (default: config.json)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Environment used when no build flag selects one
    #[arg(short, long, value_name = "ENV")]
    pub env: Option<String>,

    /// Site flag, taking priority over build flags and config defaults
    #[arg(short, long, value_name = "SITE")]
    pub site: Option<String>,

    /// Directory holding per-site subfolders (default: paths.src, then src)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Keys whose entries act as placeholder tokens (comma-separated)
    #[arg(long, value_name = "KEYS")]
    pub dynamic: Option<String>,

    /// Fail when a placeholder references an unknown token
    #[arg(long)]
    pub strict: bool,

    /// Arguments of the surrounding build invocation, e.g. `-- --alpha --production`
    #[arg(last = true, value_name = "BUILD_ARGS", allow_hyphen_values = true)]
    pub build_args: Vec<String>,
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// Tool settings for `root`, failing with context on bad settings files.
pub fn settings(root: &Path) -> Result<ToolSettings> {
    load_settings(root).with_context(|| format!("Failed loading sitecfg settings in {}", root.display()))
}

impl ResolveArgs {
    /// Layer CLI arguments over the tool settings.
    pub fn options(&self, settings: &ToolSettings) -> ResolveOptions {
        let mut options = settings.resolve_options();
        if let Some(file) = &self.file {
            options.file = file.clone();
        }
        if let Some(env) = &self.env {
            options.env = Some(env.clone());
        }
        if let Some(site) = &self.site {
            options.flag = Some(site.clone());
        }
        if let Some(directory) = &self.directory {
            options.directory = Some(directory.clone());
        }
        if let Some(dynamic) = parse_csv(&self.dynamic) {
            options.dynamic = dynamic;
        }
        if self.strict {
            options.placeholders = PlaceholderPolicy::Strict;
        }
        options
    }

    pub fn resolver(&self, root: &Path) -> ConfigResolver {
        ConfigResolver::new(root).with_flags(FlagSet::parse(&self.build_args))
    }
}
