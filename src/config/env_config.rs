//! Process-level settings parsed from environment variables.

use crate::domain::chunking::{Chunker, DEFAULT_CHUNK_COUNT, Incomplete};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Serialization format of exported results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Must be 'csv' or 'json'", s),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    /// `EnvFilter` directive for the log subscriber.
    pub log_filter: String,
    /// Chunk count used when the calculator config names no chunker.
    pub default_chunk_count: usize,
    pub output_format: OutputFormat,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            default_chunk_count: DEFAULT_CHUNK_COUNT,
            output_format: OutputFormat::Csv,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        let log_filter = env::var("PERFCALC_LOG").unwrap_or_else(|_| "info".to_string());

        let default_chunk_count = env::var("PERFCALC_DEFAULT_CHUNK_COUNT")
            .unwrap_or_else(|_| DEFAULT_CHUNK_COUNT.to_string())
            .parse::<usize>()
            .context("Failed to parse PERFCALC_DEFAULT_CHUNK_COUNT")?;
        if default_chunk_count == 0 {
            anyhow::bail!("PERFCALC_DEFAULT_CHUNK_COUNT must be positive");
        }

        let output_format = env::var("PERFCALC_OUTPUT_FORMAT")
            .unwrap_or_else(|_| "csv".to_string())
            .parse::<OutputFormat>()?;

        Ok(Self {
            log_filter,
            default_chunk_count,
            output_format,
        })
    }

    pub fn default_chunker(&self) -> Chunker {
        Chunker::Count {
            chunk_number: self.default_chunk_count,
            incomplete: Incomplete::Append,
        }
    }
}
