//! Error handling for frc-filter-tool
//!
//! Each subsystem owns a narrow error enum ([`DecodeError`], [`FilterError`]);
//! this module aggregates them into [`FilterToolError`] and provides a
//! `Result` alias plus context helpers for the host-facing APIs.

use thiserror::Error;

use crate::filter::FilterError;
use crate::wpilog::DecodeError;

/// Main error type for frc-filter-tool operations
#[derive(Error, Debug)]
pub enum FilterToolError {
    /// Log buffer could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Filter parameter was rejected
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to external sample sources
    #[error("Source error: {0}")]
    Source(String),

    /// A named channel does not exist in the decoded log
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FilterToolError>,
    },
}

impl FilterToolError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FilterToolError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for frc-filter-tool operations
pub type Result<T> = std::result::Result<T, FilterToolError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FilterToolError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterToolError::UnknownChannel("/drive/left".to_string());
        assert_eq!(err.to_string(), "Unknown channel: /drive/left");
    }

    #[test]
    fn test_error_with_context() {
        let err = FilterToolError::Config("bad value".to_string());
        let with_ctx = err.with_context("Failed to load config");
        assert!(with_ctx.to_string().contains("Failed to load config"));
        assert!(with_ctx.to_string().contains("bad value"));
    }

    #[test]
    fn test_filter_error_converts() {
        let res: std::result::Result<(), FilterError> =
            Err(FilterError::InvalidParameter("gain".to_string()));
        let err = res.context("configuring node_0").unwrap_err();
        assert!(err.to_string().starts_with("configuring node_0"));
        assert!(err.to_string().contains("gain"));
    }

    #[test]
    fn test_decode_error_converts() {
        let err: FilterToolError = DecodeError::InvalidHeader.into();
        assert!(matches!(err, FilterToolError::Decode(DecodeError::InvalidHeader)));
    }
}
