//! Settings for the `sitecfg` binary itself
//!
//! Precedence: CLI > `SITECFG_*` env > `sitecfg.yml` > `sitecfg.toml` > defaults.

use crate::error::{ResolveError, Result};
use crate::resolve::{PlaceholderPolicy, ResolveOptions, DEFAULT_CONFIG_FILE, DEFAULT_LOCK_FILE};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_TOML: &str = "sitecfg.toml";
pub const SETTINGS_YAML: &str = "sitecfg.yml";
pub const ENV_PREFIX: &str = "SITECFG_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Base config file name
    pub file: PathBuf,
    /// Lock file written by `sitecfg lock`
    pub lock: PathBuf,
    /// Environment used when no build flag selects one
    pub env: Option<String>,
    /// Directory scanned for per-site subfolders
    pub directory: Option<PathBuf>,
    /// Top-level keys eligible for placeholder substitution
    #[serde(deserialize_with = "string_or_list")]
    pub dynamic: Vec<String>,
    /// Fail on placeholders that reference unknown tokens
    pub strict: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
            lock: PathBuf::from(DEFAULT_LOCK_FILE),
            env: None,
            directory: None,
            dynamic: vec!["paths".to_string()],
            strict: false,
        }
    }
}

impl ToolSettings {
    /// Build resolver options from these settings.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            file: self.file.clone(),
            env: self.env.clone(),
            flag: None,
            directory: self.directory.clone(),
            dynamic: self.dynamic.clone(),
            placeholders: if self.strict {
                PlaceholderPolicy::Strict
            } else {
                PlaceholderPolicy::Lenient
            },
        }
    }
}

/// Load tool settings for a project rooted at `root`.
pub fn load_settings(root: &Path) -> Result<ToolSettings> {
    Figment::from(Serialized::defaults(ToolSettings::default()))
        .merge(Toml::file(root.join(SETTINGS_TOML)))
        .merge(Yaml::file(root.join(SETTINGS_YAML)))
        .merge(Env::prefixed(ENV_PREFIX).only(&["file", "lock", "env", "directory", "dynamic", "strict"]))
        .extract()
        .map_err(|e| ResolveError::Settings(Box::new(e)))
}

/// Accept either `"paths, urls"` or `["paths", "urls"]`.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_string).collect(),
        StringOrList::Many(v) => v,
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_settings_file() {
        let tmp = TempDir::new().expect("tmp");
        let settings = load_settings(tmp.path()).expect("settings");
        assert_eq!(settings.file, PathBuf::from("config.json"));
        assert_eq!(settings.lock, PathBuf::from("config.lock"));
        assert_eq!(settings.dynamic, vec!["paths".to_string()]);
        assert!(!settings.strict);
    }

    #[test]
    fn test_toml_settings_override_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(SETTINGS_TOML),
            "file = 'site.json'\ndynamic = 'paths, urls'\nstrict = true\n",
        )
        .expect("write");

        let settings = load_settings(tmp.path()).expect("settings");
        assert_eq!(settings.file, PathBuf::from("site.json"));
        assert_eq!(settings.dynamic, vec!["paths".to_string(), "urls".to_string()]);
        assert_eq!(settings.resolve_options().placeholders, PlaceholderPolicy::Strict);
    }

    #[test]
    fn test_yaml_settings_win_over_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(SETTINGS_TOML), "lock = 'a.lock'\n").expect("write");
        fs::write(tmp.path().join(SETTINGS_YAML), "lock: b.lock\ndynamic: [paths]\n")
            .expect("write");

        let settings = load_settings(tmp.path()).expect("settings");
        assert_eq!(settings.lock, PathBuf::from("b.lock"));
    }

    #[test]
    fn test_invalid_settings_type_is_error() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(SETTINGS_TOML), "strict = 'very'\n").expect("write");

        let result = load_settings(tmp.path());
        assert!(matches!(result, Err(ResolveError::Settings(_))));
    }
}
