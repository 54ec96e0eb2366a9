//! Build-argument flag tokens
//!
//! A build invocation such as `build --alpha --production --port=3000`
//! yields the tokens `alpha`, `production`, `port`. Only option names are
//! tokens; option values and positional arguments are skipped.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Ordered, de-duplicated flag tokens from a build invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    tokens: Vec<String>,
}

impl FlagSet {
    /// Tokenise raw arguments (without the program name).
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let mut set = FlagSet::default();
        let mut i = 0;

        while i < args.len() {
            let arg = args[i].as_str();
            i += 1;

            if arg == "--" {
                break;
            }

            if let Some(long) = arg.strip_prefix("--") {
                if let Some((name, _)) = long.split_once('=') {
                    set.push(name);
                    continue;
                }
                let name = long.strip_prefix("no-").unwrap_or(long);
                set.push(name);
                if !long.starts_with("no-") && takes_value(args.get(i)) {
                    i += 1;
                }
                continue;
            }

            if let Some(short) = arg.strip_prefix('-') {
                if short.is_empty() || is_number(short) {
                    continue;
                }
                if let Some((names, _)) = short.split_once('=') {
                    names.chars().for_each(|c| set.push(&c.to_string()));
                    continue;
                }
                short.chars().for_each(|c| set.push(&c.to_string()));
                if takes_value(args.get(i)) {
                    i += 1;
                }
            }
        }

        set
    }

    /// Tokens from the current process arguments.
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    fn push(&mut self, token: &str) {
        if !token.is_empty() && !self.tokens.iter().any(|t| t == token) {
            self.tokens.push(token.to_string());
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First token (in argument order) that names a key of `block`.
    pub fn first_key_of(&self, block: &Map<String, Value>) -> Option<&str> {
        self.tokens.iter().map(String::as_str).find(|t| block.contains_key(*t))
    }
}

impl<S: AsRef<str>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FlagSet::default();
        for token in iter {
            set.push(token.as_ref());
        }
        set
    }
}

fn takes_value(next: Option<&String>) -> bool {
    next.map(|n| !n.starts_with('-') || is_number(&n[1..])).unwrap_or(false)
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.parse::<f64>().is_ok()
}

/// Pick the site flag.
///
/// Candidates in priority order: the explicit flag, the build flag tokens,
/// then the config's `default-site` and `default` entries. Anything used as
/// an environment selector is skipped.
pub fn select_site(
    explicit: Option<&str>,
    flags: &FlagSet,
    config: &Map<String, Value>,
    used_environments: &BTreeSet<String>,
) -> Option<String> {
    let defaults = ["default-site", "default"]
        .into_iter()
        .filter_map(|key| config.get(key).and_then(Value::as_str));

    explicit
        .into_iter()
        .chain(flags.tokens().iter().map(String::as_str))
        .chain(defaults)
        .find(|candidate| !candidate.is_empty() && !used_environments.contains(*candidate))
        .map(str::to_string)
}

/// Site flag before any environment has been seen.
pub fn initial_site(explicit: Option<&str>, flags: &FlagSet, config: &Map<String, Value>) -> Option<String> {
    select_site(explicit, flags, config, &BTreeSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn parses_long_flags_and_skips_values() {
        let flags = FlagSet::parse(["--alpha", "--production", "--port", "3000", "watch"]);
        assert_eq!(flags.tokens(), ["alpha", "production", "port"]);
    }

    #[test]
    fn parses_assignments_negations_and_short_groups() {
        let flags = FlagSet::parse(["--site=uk", "--no-minify", "-xv", "--", "--ignored"]);
        assert_eq!(flags.tokens(), ["site", "minify", "x", "v"]);
    }

    #[test]
    fn negative_numbers_are_values() {
        let flags = FlagSet::parse(["--offset", "-5", "--beta"]);
        assert_eq!(flags.tokens(), ["offset", "beta"]);
    }

    #[test]
    fn duplicate_flags_keep_first_position() {
        let flags = FlagSet::parse(["--beta", "--alpha", "--beta"]);
        assert_eq!(flags.tokens(), ["beta", "alpha"]);
    }

    #[test]
    fn first_key_of_follows_argument_order() {
        let flags: FlagSet = ["alpha", "staging", "production"].into_iter().collect();
        let block = object(json!({"*": {}, "production": {}, "staging": {}}));
        assert_eq!(flags.first_key_of(&block), Some("staging"));
    }

    #[test]
    fn site_priority_explicit_then_flags_then_defaults() {
        let config = object(json!({"default-site": "gamma", "default": "delta"}));
        let flags: FlagSet = ["beta"].into_iter().collect();

        assert_eq!(initial_site(Some("alpha"), &flags, &config).as_deref(), Some("alpha"));
        assert_eq!(initial_site(None, &flags, &config).as_deref(), Some("beta"));
        assert_eq!(initial_site(None, &FlagSet::default(), &config).as_deref(), Some("gamma"));

        let only_default = object(json!({"default": "delta"}));
        assert_eq!(initial_site(None, &FlagSet::default(), &only_default).as_deref(), Some("delta"));
        assert_eq!(initial_site(None, &FlagSet::default(), &Map::new()), None);
    }

    #[test]
    fn site_skips_environment_tokens() {
        let config = object(json!({"default-site": "alpha"}));
        let flags: FlagSet = ["production", "uk"].into_iter().collect();
        let used: BTreeSet<String> = ["production".to_string()].into();

        assert_eq!(select_site(None, &flags, &config, &used).as_deref(), Some("uk"));

        let only_env: FlagSet = ["production"].into_iter().collect();
        assert_eq!(select_site(None, &only_env, &config, &used).as_deref(), Some("alpha"));
        assert_eq!(select_site(Some("production"), &only_env, &config, &used).as_deref(), Some("alpha"));
    }

    #[test]
    fn non_string_defaults_are_ignored() {
        let config = object(json!({"default-site": 3, "default": "beta"}));
        assert_eq!(initial_site(None, &FlagSet::default(), &config).as_deref(), Some("beta"));
    }
}
