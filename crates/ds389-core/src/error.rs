//! Shared error type across ds389 crates.

use std::time::Duration;

use thiserror::Error;

/// Coarse error classes, used for logging and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid startup configuration.
    Config,
    /// Could not reach the directory server.
    Connect,
    /// Simple bind rejected.
    Bind,
    /// A search operation failed.
    Search,
    /// Expected attribute absent from the result.
    MissingAttribute,
    /// Attribute value is not a number.
    InvalidNumber,
    /// Scrape cycle exceeded its deadline.
    Timeout,
    /// One or more sub-queries of a cycle failed.
    Partial,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::Connect => "CONNECT",
            ErrorKind::Bind => "BIND",
            ErrorKind::Search => "SEARCH",
            ErrorKind::MissingAttribute => "MISSING_ATTRIBUTE",
            ErrorKind::InvalidNumber => "INVALID_NUMBER",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Partial => "PARTIAL",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("connect to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },
    #[error("bind as {user} failed: {reason}")]
    Bind { user: String, reason: String },
    #[error("search {base} {filter} failed: {reason}")]
    Search {
        base: String,
        filter: String,
        reason: String,
    },
    #[error("no entries contain {attr} for {base}")]
    MissingAttribute { attr: String, base: String },
    #[error("{attr} of {base} is not a number: {value:?}")]
    InvalidNumber {
        attr: String,
        base: String,
        value: String,
    },
    #[error("scrape did not finish within {0:?}")]
    Timeout(Duration),
    #[error("{} sub-queries failed: {}", .0.len(), join(.0))]
    Partial(Vec<ExporterError>),
    #[error("internal: {0}")]
    Internal(String),
}

fn join(errs: &[ExporterError]) -> String {
    errs.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ExporterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExporterError::Config(_) => ErrorKind::Config,
            ExporterError::Connect { .. } => ErrorKind::Connect,
            ExporterError::Bind { .. } => ErrorKind::Bind,
            ExporterError::Search { .. } => ErrorKind::Search,
            ExporterError::MissingAttribute { .. } => ErrorKind::MissingAttribute,
            ExporterError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            ExporterError::Timeout(_) => ErrorKind::Timeout,
            ExporterError::Partial(_) => ErrorKind::Partial,
            ExporterError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Collapse collected sub-query failures into a single result.
    pub fn from_partial(errs: Vec<ExporterError>) -> Result<()> {
        if errs.is_empty() {
            Ok(())
        } else {
            Err(ExporterError::Partial(errs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_lists_every_failure() {
        let err = ExporterError::Partial(vec![
            ExporterError::Timeout(Duration::from_secs(3)),
            ExporterError::Internal("boom".into()),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 sub-queries failed"));
        assert!(msg.contains("boom"));
        assert_eq!(err.kind().as_str(), "PARTIAL");
    }

    #[test]
    fn empty_partial_is_ok() {
        assert!(ExporterError::from_partial(Vec::new()).is_ok());
    }
}
