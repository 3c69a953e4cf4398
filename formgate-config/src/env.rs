// Environment variable loading

use std::collections::HashMap;
use std::env;

/// Environment variable loader
///
/// With a prefix, only `PREFIX_*` variables are picked up and the prefix
/// is stripped. Keys are lower-cased either way.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(Some(prefix.into()))
    }

    /// Load all matching environment variables
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    /// Apply prefix filtering and key normalization to arbitrary pairs
    pub fn collect<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| self.normalize_key(&key).map(|key| (key, value)))
            .collect()
    }

    /// Strip the prefix and lower-case the key; `None` if the prefix does not match
    pub fn normalize_key(&self, key: &str) -> Option<String> {
        match self.prefix {
            Some(ref prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty())
                .map(str::to_lowercase),
            None => Some(key.to_lowercase()),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
