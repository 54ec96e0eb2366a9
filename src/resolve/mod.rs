//! Config resolution pipeline
//!
//! Base config → wildcard collapse → site override → trailing slashes →
//! placeholder substitution → double-slash collapse.

use crate::config::{load_config, merge_maps};
use crate::error::{ResolveError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub mod flags;
pub mod placeholder;
pub mod site;
pub mod wildcard;

pub use flags::FlagSet;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_LOCK_FILE: &str = "config.lock";
pub const DEFAULT_SITE_DIR: &str = "src";

/// What to do with placeholders that reference unknown tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Leave them in the output verbatim
    #[default]
    Lenient,
    /// Fail the resolution
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Base config file, relative to the resolver root
    pub file: PathBuf,
    /// Environment used when no build flag selects one
    pub env: Option<String>,
    /// Explicit site flag, taking priority over build flags
    pub flag: Option<String>,
    /// Directory holding per-site subfolders
    pub directory: Option<PathBuf>,
    /// Top-level keys whose entries act as placeholder tokens
    pub dynamic: Vec<String>,
    pub placeholders: PlaceholderPolicy,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
            env: None,
            flag: None,
            directory: None,
            dynamic: vec!["paths".to_string()],
            placeholders: PlaceholderPolicy::Lenient,
        }
    }
}

impl ResolveOptions {
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn dynamic<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn strict(mut self) -> Self {
        self.placeholders = PlaceholderPolicy::Strict;
        self
    }
}

/// Either a bare config file name or full options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Options(ResolveOptions),
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource::Options(ResolveOptions::default())
    }
}

impl ConfigSource {
    pub fn into_options(self) -> ResolveOptions {
        match self {
            ConfigSource::File(file) => ResolveOptions::default().file(file),
            ConfigSource::Options(options) => options,
        }
    }
}

impl From<&str> for ConfigSource {
    fn from(file: &str) -> Self {
        ConfigSource::File(PathBuf::from(file))
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(file: PathBuf) -> Self {
        ConfigSource::File(file)
    }
}

impl From<&Path> for ConfigSource {
    fn from(file: &Path) -> Self {
        ConfigSource::File(file.to_path_buf())
    }
}

impl From<ResolveOptions> for ConfigSource {
    fn from(options: ResolveOptions) -> Self {
        ConfigSource::Options(options)
    }
}

/// A fully resolved config and how it was reached.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub value: Value,
    /// Site flag in effect, if any
    pub site: Option<String>,
    /// Environment tokens seen while collapsing wildcard blocks
    pub environments: BTreeSet<String>,
    /// Site override file that was merged in
    pub site_file: Option<PathBuf>,
    /// Non-fatal problems met along the way
    pub warnings: Vec<ResolveError>,
}

impl ResolvedConfig {
    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }
}

/// Resolves config files relative to a working directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    root: PathBuf,
    flags: FlagSet,
}

impl ConfigResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), flags: FlagSet::default() }
    }

    /// Resolver for the current working directory and process arguments.
    pub fn from_env() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?).with_flags(FlagSet::from_env()))
    }

    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn resolve(&self, source: impl Into<ConfigSource>) -> Result<ResolvedConfig> {
        self.resolve_options(&source.into().into_options())
    }

    pub fn resolve_options(&self, options: &ResolveOptions) -> Result<ResolvedConfig> {
        let base_path = self.root.join(&options.file);
        let mut config = load_config(&base_path)?;
        tracing::debug!("Loaded base config {}", base_path.display());

        let explicit = options.flag.as_deref();
        let mut site = flags::initial_site(explicit, &self.flags, &config);

        let mut environments =
            wildcard::collapse_wildcards(&mut config, &self.flags, options.env.as_deref());

        if site.as_ref().is_some_and(|s| environments.contains(s)) {
            let rejected = site.take();
            site = flags::select_site(explicit, &self.flags, &config, &environments);
            tracing::debug!("Site flag {:?} is an environment flag, using {:?}", rejected, site);
        }

        let mut warnings = Vec::new();
        let mut site_file = None;
        if let Some(site_flag) = site.as_deref() {
            let directory = self.root.join(site_directory(options, &config));
            match site::load_site_override(&directory, site_flag, &options.file) {
                Ok((path, mut overrides)) => {
                    tracing::debug!("Merging site config {}", path.display());
                    environments.extend(wildcard::collapse_wildcards(
                        &mut overrides,
                        &self.flags,
                        options.env.as_deref(),
                    ));
                    config = merge_maps(config, overrides);
                    site_file = Some(path);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    warnings.push(e);
                }
            }
        }

        if let Some(Value::Object(paths)) = config.get_mut("paths") {
            placeholder::normalize_trailing_slashes(paths);
        }

        let site_token = site.as_deref().or_else(|| config.get("site").and_then(Value::as_str));
        let tokens = placeholder::token_table(&config, &options.dynamic, site_token);

        let mut value = Value::Object(config);
        placeholder::substitute(&mut value, &tokens);
        placeholder::collapse_double_slashes(&mut value);

        let unresolved = placeholder::unresolved_placeholders(&value);
        if !unresolved.is_empty() {
            match options.placeholders {
                PlaceholderPolicy::Strict => {
                    return Err(ResolveError::UnresolvedPlaceholders {
                        tokens: unresolved.into_iter().collect(),
                    });
                }
                PlaceholderPolicy::Lenient => {
                    tracing::debug!("Leaving unresolved placeholders: {:?}", unresolved);
                }
            }
        }

        Ok(ResolvedConfig { value, site, environments, site_file, warnings })
    }
}

fn site_directory(options: &ResolveOptions, config: &Map<String, Value>) -> PathBuf {
    if let Some(directory) = &options.directory {
        return directory.clone();
    }
    config
        .get("paths")
        .and_then(|paths| paths.get("src"))
        .and_then(Value::as_str)
        .filter(|src| !src.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_DIR))
}
