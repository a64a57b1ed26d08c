//! Configuration for perfcalc.
//!
//! Calculator settings come from a TOML file; process-level settings come from
//! environment variables.

mod env_config;

pub use env_config::{EnvConfig, OutputFormat};

use crate::application::calculator::CalculatorConfig;
use crate::domain::chunking::Chunker;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parses a calculator configuration from TOML.
///
/// `default_chunker` is used when the document has no `[chunker]` table.
pub fn parse_calculator_config(raw: &str, default_chunker: &Chunker) -> Result<CalculatorConfig> {
    let table: toml::Table = toml::from_str(raw).context("Invalid TOML")?;
    let mut config: CalculatorConfig =
        toml::from_str(raw).context("Invalid calculator configuration")?;
    if !table.contains_key("chunker") {
        config.chunker = default_chunker.clone();
    }
    Ok(config)
}

pub fn load_calculator_config(
    path: impl AsRef<Path>,
    default_chunker: &Chunker,
) -> Result<CalculatorConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_calculator_config(&raw, default_chunker)
        .with_context(|| format!("Failed to load calculator config from {}", path.display()))
}
