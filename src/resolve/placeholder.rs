//! Path normalization and `{token}` substitution
//!
//! Substitution walks the parsed tree and rewrites string leaves only.
//! Object keys are never rewritten.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// `{name}` where name holds no braces.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid regex"));

/// Identifier-like placeholders, reported when left unresolved.
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[A-Za-z0-9_.\-]+\}").expect("valid regex"));

/// A run of two or more slashes not preceded by a colon, so `file:///` keeps
/// all three.
static DOUBLE_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[^:/])//+").expect("valid regex"));

pub type TokenTable = BTreeMap<String, String>;

/// End every non-empty string in `paths` with exactly one `/`.
///
/// A bare scheme root such as `https://` is kept as is.
pub fn normalize_trailing_slashes(paths: &mut Map<String, Value>) {
    for value in paths.values_mut() {
        if let Value::String(s) = value {
            if let Some(normalized) = with_trailing_slash(s) {
                *s = normalized;
            }
        }
    }
}

fn with_trailing_slash(s: &str) -> Option<String> {
    if s.is_empty() || s.ends_with("://") {
        return None;
    }
    let trimmed = s.trim_end_matches('/');
    let normalized = format!("{trimmed}/");
    (normalized != s).then_some(normalized)
}

/// Build the token table from the config.
///
/// Scalar entries of `paths` come first, then scalar entries of the other
/// dynamic keys; the first definition of a name wins. `site` is added last
/// when nothing else defined it.
pub fn token_table(config: &Map<String, Value>, dynamic: &[String], site: Option<&str>) -> TokenTable {
    let mut table = TokenTable::new();

    let sources = std::iter::once("paths").chain(dynamic.iter().map(String::as_str));
    for key in sources {
        let Some(entries) = config.get(key).and_then(Value::as_object) else {
            continue;
        };
        for (name, value) in entries {
            if table.contains_key(name) {
                continue;
            }
            if let Some(text) = scalar_text(value) {
                table.insert(name.clone(), text);
            }
        }
    }

    if let Some(site) = site {
        table.entry("site".to_string()).or_insert_with(|| site.to_string());
    }

    expand_table(&mut table);
    table
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve tokens that reference other tokens, e.g. `"dist": "{src}dist"`.
///
/// Bounded by the table size so self-references terminate.
fn expand_table(table: &mut TokenTable) {
    for _ in 0..table.len() {
        let snapshot = table.clone();
        let mut changed = false;
        for value in table.values_mut() {
            if let Some(expanded) = substitute_str(value, &snapshot) {
                *value = expanded;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Replace known `{name}` tokens in `text`. `None` when nothing changed.
pub fn substitute_str(text: &str, tokens: &TokenTable) -> Option<String> {
    if !text.contains('{') {
        return None;
    }
    let replaced = TOKEN_PATTERN.replace_all(text, |caps: &Captures| match tokens.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    });
    (replaced != text).then(|| replaced.into_owned())
}

/// Substitute tokens in every string leaf of `value`.
pub fn substitute(value: &mut Value, tokens: &TokenTable) {
    visit_strings(value, &mut |s| {
        if let Some(replaced) = substitute_str(s, tokens) {
            *s = replaced;
        }
    });
}

/// Collapse repeated slashes in every string leaf, keeping `scheme://`.
pub fn collapse_double_slashes(value: &mut Value) {
    visit_strings(value, &mut |s| {
        if s.contains("//") {
            let collapsed = DOUBLE_SLASH.replace_all(s, "${1}/");
            if collapsed != s.as_str() {
                *s = collapsed.into_owned();
            }
        }
    });
}

/// Placeholder-looking tokens still present in `value`.
pub fn unresolved_placeholders(value: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect_placeholders(value, &mut found);
    found
}

fn collect_placeholders(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            found.extend(PLACEHOLDER_PATTERN.find_iter(s).map(|m| m.as_str().to_string()));
        }
        Value::Array(items) => items.iter().for_each(|item| collect_placeholders(item, found)),
        Value::Object(map) => map.values().for_each(|item| collect_placeholders(item, found)),
        _ => {}
    }
}

fn visit_strings(value: &mut Value, f: &mut dyn FnMut(&mut String)) {
    match value {
        Value::String(s) => f(s),
        Value::Array(items) => items.iter_mut().for_each(|item| visit_strings(item, f)),
        Value::Object(map) => map.values_mut().for_each(|item| visit_strings(item, f)),
        _ => {}
    }
}
