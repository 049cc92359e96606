//! CLI enum types shared by subcommands.

use clap::ValueEnum;
use thumber_core::OutputFormat as CoreOutputFormat;

/// Supported report formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl ReportFormat {
    /// Resolve the CLI flag, falling back to the configured default.
    pub fn resolve(flag: Option<Self>, configured: &str) -> CoreOutputFormat {
        match flag {
            Some(Self::Json) => CoreOutputFormat::Json,
            Some(Self::Jsonl) => CoreOutputFormat::JsonLines,
            None => CoreOutputFormat::parse(configured).unwrap_or(CoreOutputFormat::JsonLines),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
