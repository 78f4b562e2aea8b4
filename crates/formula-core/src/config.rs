//! Parser configuration
//!
//! Settings can come from a TOML `[parser]` table, from environment
//! variables, or from code. Every field has a default so partial
//! configuration files are accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable overriding [`ParserConfig::max_nesting_depth`]
pub const ENV_MAX_NESTING_DEPTH: &str = "FORMULA_MAX_NESTING_DEPTH";
/// Environment variable overriding [`ParserConfig::max_formula_length`]
pub const ENV_MAX_LENGTH: &str = "FORMULA_MAX_LENGTH";
/// Environment variable overriding [`ParserConfig::max_tree_depth`]
pub const ENV_MAX_TREE_DEPTH: &str = "FORMULA_MAX_TREE_DEPTH";
/// Environment variable overriding [`ParserConfig::strip_whitespace`]
pub const ENV_STRIP_WHITESPACE: &str = "FORMULA_STRIP_WHITESPACE";

/// Highest accepted `max_nesting_depth`
pub const NESTING_DEPTH_CEILING: usize = 256;
/// Highest accepted `max_tree_depth`. Evaluation, display and drop all
/// recurse once per level.
pub const TREE_DEPTH_CEILING: usize = 2048;
/// Highest accepted `max_formula_length`, in bytes
pub const FORMULA_LENGTH_CEILING: usize = 1 << 20;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid parser configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid parser setting '{setting}': {message}")]
    Invalid { setting: &'static str, message: String },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ParserConfig {
    /// Deepest parenthesis nesting accepted
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Longest formula accepted, in bytes
    #[serde(default = "default_max_formula_length")]
    pub max_formula_length: usize,
    /// Deepest expression tree accepted, counting leaves as one level
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
    /// Drop ASCII whitespace before validation
    #[serde(default)]
    pub strip_whitespace: bool,
}

fn default_max_nesting_depth() -> usize {
    64
}

fn default_max_formula_length() -> usize {
    4096
}

fn default_max_tree_depth() -> usize {
    512
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            max_formula_length: default_max_formula_length(),
            max_tree_depth: default_max_tree_depth(),
            strip_whitespace: false,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    parser: ParserConfig,
}

impl ParserConfig {
    /// Load from TOML text containing an optional `[parser]` table
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.parser.validated()
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, then check the result. Unparseable
    /// values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(depth) = parse_override::<usize>(&lookup, ENV_MAX_NESTING_DEPTH) {
            self.max_nesting_depth = depth;
        }
        if let Some(length) = parse_override::<usize>(&lookup, ENV_MAX_LENGTH) {
            self.max_formula_length = length;
        }
        if let Some(depth) = parse_override::<usize>(&lookup, ENV_MAX_TREE_DEPTH) {
            self.max_tree_depth = depth;
        }
        if let Some(strip) = parse_override::<bool>(&lookup, ENV_STRIP_WHITESPACE) {
            self.strip_whitespace = strip;
        }
        self.validated()
    }

    /// Check limits are usable and bounded
    pub fn validated(self) -> Result<Self, ConfigError> {
        check_range("max_formula_length", self.max_formula_length, 1, FORMULA_LENGTH_CEILING)?;
        check_range("max_tree_depth", self.max_tree_depth, 1, TREE_DEPTH_CEILING)?;
        check_range("max_nesting_depth", self.max_nesting_depth, 0, NESTING_DEPTH_CEILING)?;
        Ok(self)
    }
}

fn check_range(
    setting: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Invalid { setting, message: format!("{value} is outside {min}..={max}") })
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable configuration override");
            None
        }
    }
}
