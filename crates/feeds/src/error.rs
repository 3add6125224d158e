//! Error types for quote requests.

use thiserror::Error;

/// Errors from a single quote request.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("RPC endpoint unreachable: {0}")]
    Transport(String),

    #[error("RPC request timed out")]
    Timeout,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed quote response: {0}")]
    Malformed(String),

    #[error("Quoted amount does not fit in 128 bits")]
    Overflow,
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Timeout
        } else if err.is_decode() {
            QuoteError::Malformed(err.to_string())
        } else {
            QuoteError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Malformed(err.to_string())
    }
}

impl From<hex::FromHexError> for QuoteError {
    fn from(err: hex::FromHexError) -> Self {
        QuoteError::Malformed(err.to_string())
    }
}

impl QuoteError {
    /// True when the endpoint itself could not be reached, as opposed to the
    /// venue answering with a revert or garbage. When every venue on a
    /// network fails this way the whole network scan is abandoned.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, QuoteError::Transport(_) | QuoteError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_classification() {
        assert!(QuoteError::Transport("connection refused".into()).is_unreachable());
        assert!(QuoteError::Timeout.is_unreachable());
        assert!(!QuoteError::Rpc {
            code: 3,
            message: "execution reverted".into()
        }
        .is_unreachable());
        assert!(!QuoteError::Malformed("short".into()).is_unreachable());
        assert!(!QuoteError::Overflow.is_unreachable());
    }
}
