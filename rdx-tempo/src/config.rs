//! Defines the configuration for a `TempoRegistry` and the tools around it.
//!
//! The struct deserializes with `serde`, so it can be layered from a TOML
//! file and `TEMPO_`-prefixed environment variables through the `config`
//! crate. Every field has a default, so an empty source is valid.

use crate::format::Format;
use serde::Deserialize;
use std::path::Path;

/// Slot table size used when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 32;

/// The top-level Tempo configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TempoConfig {
    /// Maximum number of distinct timer ids the registry will register.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Render style used by the bundled tools when none is given.
    #[serde(default)]
    pub default_format: Format,
}

impl TempoConfig {
    /// Loads the configuration from an optional TOML file, then applies
    /// `TEMPO_CAPACITY` / `TEMPO_DEFAULT_FORMAT` from the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("TEMPO").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

// --- Default value functions for serde ---

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            default_format: Format::default(),
        }
    }
}
