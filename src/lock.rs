//! Lock file persistence
//!
//! The lock file is a pretty-printed snapshot of the last resolved config.
//! It is rewritten only when the resolved value changes, unless a recreate
//! is requested.

use crate::config::load_snapshot;
use crate::error::{ResolveError, Result};
use crate::resolve::{ConfigResolver, ConfigSource, ResolveOptions, ResolvedConfig, DEFAULT_LOCK_FILE};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to the lock file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAction {
    Created,
    Updated,
    Recreated,
    Unchanged,
}

impl LockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockAction::Created => "Created",
            LockAction::Updated => "Updated",
            LockAction::Recreated => "Recreated",
            LockAction::Unchanged => "Unchanged",
        }
    }

    pub fn wrote(&self) -> bool {
        !matches!(self, LockAction::Unchanged)
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a lock operation.
#[derive(Debug)]
pub struct Persisted {
    pub resolved: ResolvedConfig,
    pub action: LockAction,
    /// Set when writing the lock file failed; `action` then names the
    /// write that was attempted.
    pub write_error: Option<ResolveError>,
}

/// Resolves configs and keeps the lock file in sync.
///
/// Remembers the options of the last call so a later [`Session::create`]
/// without a source can replay them.
#[derive(Debug, Clone)]
pub struct Session {
    resolver: ConfigResolver,
    lock_path: PathBuf,
    last: Option<ResolveOptions>,
}

impl Session {
    pub fn new(resolver: ConfigResolver) -> Self {
        let lock_path = resolver.root().join(DEFAULT_LOCK_FILE);
        Self { resolver, lock_path, last: None }
    }

    /// Use a different lock file, relative to the resolver root.
    pub fn with_lock_file(mut self, lock: impl AsRef<Path>) -> Self {
        self.lock_path = self.resolver.root().join(lock);
        self
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn last_options(&self) -> Option<&ResolveOptions> {
        self.last.as_ref()
    }

    /// Resolve and write the lock file when the result changed.
    ///
    /// Without a source, the last options are replayed and the lock file is
    /// rewritten unconditionally. With nothing to replay the defaults are
    /// used.
    pub fn create(&mut self, source: Option<ConfigSource>) -> Result<Persisted> {
        match (source, self.last.clone()) {
            (Some(source), _) => self.persist(source.into_options(), false),
            (None, Some(last)) => self.persist(last, true),
            (None, None) => self.persist(ResolveOptions::default(), false),
        }
    }

    /// Forget the remembered options, then [`Session::create`] from `source`.
    pub fn update(&mut self, source: impl Into<ConfigSource>) -> Result<Persisted> {
        self.last = None;
        self.create(Some(source.into()))
    }

    /// Resolve from `source` and rewrite the lock file unconditionally.
    pub fn recreate(&mut self, source: impl Into<ConfigSource>) -> Result<Persisted> {
        self.persist(source.into().into_options(), true)
    }

    fn persist(&mut self, options: ResolveOptions, force: bool) -> Result<Persisted> {
        let resolved = self.resolver.resolve_options(&options)?;
        self.last = Some(options);

        let existed = self.lock_path.exists();
        let previous = load_snapshot(&self.lock_path);

        let action = if force {
            LockAction::Recreated
        } else if previous.as_ref() == Some(&resolved.value) {
            LockAction::Unchanged
        } else if existed {
            LockAction::Updated
        } else {
            LockAction::Created
        };

        let mut write_error = None;
        if action.wrote() {
            match write_lock(&self.lock_path, &resolved.value) {
                Ok(()) => tracing::info!("{}: {}", action, self.lock_path.display()),
                Err(e) => {
                    tracing::error!("{}", e);
                    write_error = Some(e);
                }
            }
        } else {
            tracing::debug!("Lock file {} is up to date", self.lock_path.display());
        }

        Ok(Persisted { resolved, action, write_error })
    }
}

/// Write `value` as two-space indented JSON.
pub fn write_lock(path: &Path, value: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| ResolveError::LockWrite {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    fs::write(path, content)
        .map_err(|source| ResolveError::LockWrite { path: path.to_path_buf(), source })
}
