use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Pipeline stage that talks to a remote collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Chain,
    Feed,
    BridgeQuote,
    MessageQuote,
    Allowance,
    Balance,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Chain => "chain",
            Self::Feed => "feed",
            Self::BridgeQuote => "bridge_quote",
            Self::MessageQuote => "message_quote",
            Self::Allowance => "allowance",
            Self::Balance => "balance",
        };
        f.write_str(name)
    }
}

/// Failures of remote collaborators that a caller may retry.
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    #[error("feed returned HTTP {status}")]
    FeedStatus { status: u16 },

    #[error("{stage} unavailable: {reason}")]
    Unavailable { stage: Stage, reason: String },

    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: Stage, secs: u64 },

    #[error("{stage} returned an unusable quote: {reason}")]
    BadQuote { stage: Stage, reason: String },
}

/// Execution-related errors with structured variants.
///
/// These are terminal for the dispatch that produced them.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to approve spender: {0}")]
    ApprovalFailed(String),

    #[error("wallet holds {balance}, need {required}")]
    InsufficientBalance { balance: String, required: String },

    #[error("allowance still {allowance} after approval, need {required}")]
    AllowanceShort { allowance: String, required: String },

    #[error("failed to sign report: {0}")]
    SigningFailed(String),

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("{action} not confirmed within {secs}s")]
    ConfirmationTimeout { action: &'static str, secs: u64 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True when retrying the whole operation later may succeed.
    ///
    /// Only upstream failures qualify. Configuration, consistency and
    /// submission errors need an operator.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_recoverable() {
        let err: Error = UpstreamError::Timeout {
            stage: Stage::MessageQuote,
            secs: 30,
        }
        .into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "message_quote timed out after 30s");
    }

    #[test]
    fn submission_errors_are_terminal() {
        let err: Error = ExecutionError::Reverted {
            tx_hash: "0xabc".into(),
        }
        .into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn domain_errors_are_terminal() {
        let err: Error = DomainError::LengthMismatch {
            tokens: 2,
            balances: 1,
        }
        .into();
        assert!(!err.is_recoverable());
    }
}
