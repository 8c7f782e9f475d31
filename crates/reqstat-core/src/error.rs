//! Shared error type across reqstat crates.

use thiserror::Error;

/// Stable error classification used by hosts to decide how loud to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Setup defect. Fail fast, before any timing happens.
    Configuration,
    /// Optional request/response data missing. Never raised; listed for completeness.
    ContextGap,
    /// Sink unreachable or timed out. Always discarded.
    Transport,
    /// Host signalled lifecycle events out of order.
    Lifecycle,
}

impl ErrorClass {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Configuration => "CONFIGURATION",
            ErrorClass::ContextGap => "CONTEXT_GAP",
            ErrorClass::Transport => "TRANSPORT",
            ErrorClass::Lifecycle => "LIFECYCLE",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqstatError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ReqstatError {
    #[error("request origin time is not available; timing cannot proceed")]
    MissingRequestOrigin,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),
    #[error("event `{name}` ended without a matching start")]
    UnmatchedEnd { name: String },
}

impl ReqstatError {
    /// Map an error to its stable class.
    pub fn class(&self) -> ErrorClass {
        match self {
            ReqstatError::MissingRequestOrigin | ReqstatError::InvalidConfig(_) => {
                ErrorClass::Configuration
            }
            ReqstatError::Transport(_) => ErrorClass::Transport,
            ReqstatError::UnmatchedEnd { .. } => ErrorClass::Lifecycle,
        }
    }
}
