//! Generator configuration
//!
//! All tunable constants live on [`GeneratorConfig`]. Partial JSON configs are
//! accepted; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default maximum identifier length
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 12;
/// Default exclusive upper bound for number literals
pub const DEFAULT_MAX_INT: u64 = 128;
/// Default size budget of a whole program, in bytes of output text
pub const DEFAULT_SIZE_BUDGET: usize = 512;
/// Default size budget of a single conditional branch body
pub const DEFAULT_BLOCK_SIZE_BUDGET: usize = 64;
/// Default scope depth at which conditionals stop nesting
pub const DEFAULT_MAX_INDENT_LEVEL: usize = 3;
/// Default cap on unique-identifier retries
pub const DEFAULT_MAX_IDENTIFIER_ATTEMPTS: usize = 1000;
/// Default indentation unit
pub const DEFAULT_INDENT: &str = "  ";

/// Configuration for a [`Generator`](crate::generator::Generator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Longest identifier or string payload that may be generated
    pub max_identifier_length: usize,
    /// Number literals are drawn from `[0, max_int)`
    pub max_int: u64,
    /// Budget used when `generate_program` is called without one
    pub size_budget: usize,
    /// Budget for each conditional branch body
    pub block_size_budget: usize,
    /// Conditionals requested at this scope depth or deeper produce nothing
    pub max_indent_level: usize,
    /// Candidate names tried before giving up on a declaration
    pub max_identifier_attempts: usize,
    /// Indentation unit, repeated once per nested scope
    pub indent: String,
    /// Seed for reproducible output; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            max_int: DEFAULT_MAX_INT,
            size_budget: DEFAULT_SIZE_BUDGET,
            block_size_budget: DEFAULT_BLOCK_SIZE_BUDGET,
            max_indent_level: DEFAULT_MAX_INDENT_LEVEL,
            max_identifier_attempts: DEFAULT_MAX_IDENTIFIER_ATTEMPTS,
            indent: DEFAULT_INDENT.to_string(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Set the random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the default program size budget
    #[must_use]
    pub fn with_size_budget(mut self, size_budget: usize) -> Self {
        self.size_budget = size_budget;
        self
    }

    /// Set the branch body size budget
    #[must_use]
    pub fn with_block_size_budget(mut self, block_size_budget: usize) -> Self {
        self.block_size_budget = block_size_budget;
        self
    }

    /// Set the maximum nesting depth
    #[must_use]
    pub fn with_max_indent_level(mut self, max_indent_level: usize) -> Self {
        self.max_indent_level = max_indent_level;
        self
    }

    /// Check that every bound is usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let zero_fields = [
            ("max_identifier_length", self.max_identifier_length == 0),
            ("max_int", self.max_int == 0),
            ("block_size_budget", self.block_size_budget == 0),
            ("max_indent_level", self.max_indent_level == 0),
            ("max_identifier_attempts", self.max_identifier_attempts == 0),
        ];
        if let Some((field, _)) = zero_fields.iter().find(|(_, is_zero)| *is_zero) {
            return Err(Error::Configuration(format!("{field} must be positive")));
        }
        let indent_ok = !self.indent.is_empty()
            && self
                .indent
                .chars()
                .all(|c| c.is_whitespace() && c != '\n' && c != '\r');
        if !indent_ok {
            return Err(Error::Configuration(format!(
                "indent must be non-empty horizontal whitespace, got {:?}",
                self.indent
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
