//! Unified error types for the mock wallet.
//!
//! [`WalletError`] is what the request dispatcher produces internally. It never
//! crosses [`Wallet::request`](crate::wallet::Wallet::request), which turns it
//! into a `null` result, but [`Wallet::try_request`](crate::wallet::Wallet::try_request)
//! hands it to callers that want to assert on failure causes.
//!
//! [`Error`] covers the binary: configuration, signer resolution and serving.

use alloy_primitives::Address;
use thiserror::Error;

/// Failure raised while handling a single provider request.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The signing credential lacks the capability a method needs.
    #[error("method `{0}` not supported by account")]
    UnsupportedMethod(String),

    /// The `from` address does not belong to the credential.
    #[error("invalid from address: expected {expected}, got {got}")]
    InvalidSender {
        /// Credential address.
        expected: Address,
        /// Address supplied by the caller, verbatim.
        got: String,
    },

    /// The network client rejected or failed a submission or query.
    #[error("upstream: {0}")]
    UpstreamFailure(String),

    /// Parameters are missing or do not have the expected shape.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The signer failed for a reason other than a missing capability.
    #[error("signing: {0}")]
    Signing(String),
}

impl WalletError {
    /// Builds an [`WalletError::UpstreamFailure`] from any displayable error.
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::UpstreamFailure(err.to_string())
    }

    /// Builds an [`WalletError::InvalidParams`] from a message.
    pub fn params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }
}

impl From<alloy_signer::Error> for WalletError {
    fn from(err: alloy_signer::Error) -> Self {
        match err {
            alloy_signer::Error::UnsupportedOperation(op) => Self::UnsupportedMethod(op.to_string()),
            other => Self::Signing(other.to_string()),
        }
    }
}

/// Top-level error type for the mock wallet application.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be resolved, read, or parsed.
    #[error("config: {0}")]
    Config(String),

    /// Signer key resolution or derivation failed.
    #[error("signer: {0}")]
    Signer(String),

    /// Server bind or runtime error.
    #[error("server: {0}")]
    Server(String),
}

impl Error {
    /// Configuration error from a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Configuration error from a message and an underlying cause.
    pub fn config_with(msg: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::Config(format!("{msg}: {err}"))
    }

    /// Signer error from a message.
    pub fn signer(msg: impl Into<String>) -> Self {
        Self::Signer(msg.into())
    }

    /// Server error from a message and an underlying cause.
    pub fn server_with(msg: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::Server(format!("{msg}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_operation_maps_to_unsupported_method() {
        let err: WalletError =
            alloy_signer::Error::UnsupportedOperation(alloy_signer::UnsupportedSignerOperation::SignHash)
                .into();
        assert!(matches!(err, WalletError::UnsupportedMethod(_)));
    }

    #[test]
    fn invalid_sender_names_both_addresses() {
        let err = WalletError::InvalidSender {
            expected: Address::ZERO,
            got: "0xdead".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("0x0000000000000000000000000000000000000000"));
        assert!(msg.contains("0xdead"));
    }

    #[test]
    fn config_with_joins_cause() {
        let err = Error::config_with("failed to write 'a.toml'", "permission denied");
        assert_eq!(err.to_string(), "config: failed to write 'a.toml': permission denied");
    }
}
