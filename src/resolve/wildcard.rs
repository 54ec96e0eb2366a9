//! Wildcard block collapse
//!
//! A wildcard block is a top-level object with a `*` key holding defaults
//! and sibling keys holding per-environment overrides:
//!
//! ```json
//! "settings": { "*": { "minify": false }, "production": { "minify": true } }
//! ```

use super::flags::FlagSet;
use crate::config::deep_merge;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const WILDCARD_KEY: &str = "*";

/// Collapse every top-level wildcard block in place.
///
/// Returns the environment tokens that were in play: `env` itself plus each
/// token chosen for a block.
pub fn collapse_wildcards(
    config: &mut Map<String, Value>,
    flags: &FlagSet,
    env: Option<&str>,
) -> BTreeSet<String> {
    let mut used: BTreeSet<String> = env.map(str::to_string).into_iter().collect();

    for (key, value) in config.iter_mut() {
        let Some(block) = value.as_object_mut() else {
            continue;
        };
        if !block.contains_key(WILDCARD_KEY) {
            continue;
        }

        let environment = flags.first_key_of(block).or(env).map(str::to_string);
        tracing::debug!("Collapsing wildcard block \"{}\" for environment {:?}", key, environment);

        *value = collapse_block(block, environment.as_deref());
        used.extend(environment);
    }

    used
}

/// `*` deep-merged with the `environment` entry, or `*` alone.
pub fn collapse_block(block: &mut Map<String, Value>, environment: Option<&str>) -> Value {
    let defaults = block.remove(WILDCARD_KEY).unwrap_or(Value::Null);
    match environment.and_then(|env| block.remove(env)) {
        Some(overrides) => deep_merge(defaults, overrides),
        None => defaults,
    }
}
