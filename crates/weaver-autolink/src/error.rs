//! Error types for weaver-autolink.
//!
//! Rewriting itself never fails: unrecognised candidates pass through as
//! plain text and an over-budget rewrite is a no-op. Errors only come from
//! loading and validating configuration.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AutolinkError {
    #[error("failed to read config file: {0}")]
    #[diagnostic(code(autolink::config::io))]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    #[diagnostic(code(autolink::config::parse))]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {reason}")]
    #[diagnostic(code(autolink::config::invalid))]
    Invalid {
        reason: String,
        #[help]
        advice: String,
    },
}

impl AutolinkError {
    pub(crate) fn invalid(reason: impl Into<String>, advice: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
            advice: advice.into(),
        }
    }
}

pub type Result<T, E = AutolinkError> = std::result::Result<T, E>;
