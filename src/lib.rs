//! sitecfg: resolve one `config.json` into site- and environment-specific configs
//!
//! Loads a base JSON config, collapses `*` wildcard blocks for the active
//! environment, merges the config file of the selected site subdirectory,
//! substitutes `{token}` placeholders from `paths`, and keeps a
//! `config.lock` snapshot in sync.
//!
//! ```no_run
//! use sitecfg::{ConfigResolver, ResolveOptions, Session};
//!
//! let resolver = ConfigResolver::from_env()?;
//! let resolved = resolver.resolve(ResolveOptions::default().env("production"))?;
//! println!("{}", resolved.value["paths"]["dist"]);
//!
//! let mut session = Session::new(resolver);
//! session.create(Some("config.json".into()))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod resolve;

pub use error::{ResolveError, Result};
pub use lock::{LockAction, Persisted, Session};
pub use resolve::{
    ConfigResolver, ConfigSource, FlagSet, PlaceholderPolicy, ResolveOptions, ResolvedConfig,
};
