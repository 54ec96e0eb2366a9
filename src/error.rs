//! Error types for config resolution and lock persistence.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while resolving a config.
///
/// Only the load family (`Load`, `Parse`, `NotAnObject`) and
/// `UnresolvedPlaceholders` abort a resolution. The site override variants
/// are collected as warnings on [`crate::ResolvedConfig`], and `LockWrite`
/// is reported next to the resolved config instead of replacing it.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON
    #[error("invalid JSON in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config file parsed but its top level is not an object
    #[error("config file {path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    /// Site directory could not be listed
    #[error("cannot scan site directory {directory} for the \"{site}\" flag: {source}")]
    SiteDirectory {
        site: String,
        directory: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// No subdirectory or no config file matched the site flag
    #[error("the config file associated with the \"{site}\" flag doesn't exist in {directory}")]
    SiteOverrideNotFound { site: String, directory: PathBuf },

    /// Site config file exists but is malformed
    #[error("the config file associated with the \"{site}\" flag has a syntax error: {path}")]
    SiteOverrideParse {
        site: String,
        path: PathBuf,
        #[source]
        source: Box<ResolveError>,
    },

    /// Lock file could not be written
    #[error("failed to write lock file {path}: {source}")]
    LockWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Placeholders left unresolved while running in strict mode
    #[error("unresolved placeholders: {}", tokens.join(", "))]
    UnresolvedPlaceholders { tokens: Vec<String> },

    /// Tool settings could not be extracted
    #[error("invalid sitecfg settings: {0}")]
    Settings(#[from] Box<figment::Error>),
}

impl ResolveError {
    /// Whether resolution continues past this error.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ResolveError::SiteDirectory { .. }
                | ResolveError::SiteOverrideNotFound { .. }
                | ResolveError::SiteOverrideParse { .. }
        )
    }
}
