//! Config file loading

use crate::error::{ResolveError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read a JSON config file and return its top-level object.
///
/// Used for both the base config and site override files; callers decide
/// whether a failure is fatal.
pub fn load_config(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .map_err(|source| ResolveError::Load { path: path.to_path_buf(), source })?;

    parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<Map<String, Value>> {
    let raw: Value = serde_json::from_str(content)
        .map_err(|source| ResolveError::Parse { path: path.to_path_buf(), source })?;

    match raw {
        Value::Object(map) => Ok(map),
        _ => Err(ResolveError::NotAnObject { path: path.to_path_buf() }),
    }
}

/// Read a previously written lock file.
///
/// Any failure (missing file, unreadable, not JSON) yields `None` so the
/// caller treats it as "no prior lock".
pub fn load_snapshot(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Ignoring unreadable lock file {}: {}", path.display(), e);
            None
        }
    }
}
