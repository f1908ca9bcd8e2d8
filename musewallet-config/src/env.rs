// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Environment variable loader
///
/// Keys are looked up as `{PREFIX}_{KEY}`. Empty values count as unset, which
/// matches how deployment tooling tends to blank out optional variables.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
    vars: Option<HashMap<String, String>>,
}

impl EnvLoader {
    /// Create a loader reading the process environment
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix, vars: None }
    }

    /// Create a loader backed by a fixed set of variables instead of the
    /// process environment
    pub fn with_vars(prefix: Option<String>, vars: HashMap<String, String>) -> Self {
        Self {
            prefix,
            vars: Some(vars),
        }
    }

    /// Load a `.env` file (if present) into the process environment first
    pub fn with_dotenv(prefix: Option<String>) -> Self {
        dotenvy::dotenv().ok();
        Self::new(prefix)
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific variable, treating an empty value as unset
    pub fn get(&self, key: &str) -> Option<String> {
        let full_key = self.full_key(key);
        let value = match self.vars {
            Some(ref vars) => vars.get(&full_key).cloned(),
            None => env::var(&full_key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Load a specific variable or fail
    pub fn load_var(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(self.full_key(key)))
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::invalid(self.full_key(key), format!("cannot parse '{}'", raw))
            }),
            None => Ok(default),
        }
    }

    /// Parse a boolean flag, falling back to `default` when unset
    pub fn flag_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::invalid(self.full_key(key), format!("'{}' is not a boolean", raw))
            }),
            None => Ok(default),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
