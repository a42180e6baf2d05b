//! Exporter config loader (strict parsing).

pub mod cli;
pub mod schema;

use std::fs;

use ds389_core::error::{ExporterError, Result};

pub use cli::Cli;
pub use schema::{ExporterConfig, LdapSection, LogSection, ScrapeSection, WebSection};

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse without validating; [`Cli::resolve`] validates after applying overrides.
pub(crate) fn parse_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config {path} failed: {e}")))?;
    parse_str(&s)
}

pub(crate) fn parse_str(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))
}
