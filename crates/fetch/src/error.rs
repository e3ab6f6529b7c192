//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Individual strategy failures are plain values ([`FailureCause`]) rather
//! than `Exn` trees: they're expected, they get logged and swallowed, and
//! only surface collectively inside [`ErrorKind::AllStrategiesFailed`].

use crate::descriptor::DescriptorStrategy;
use derive_more::{Display, Error};
use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};
use std::ops::Deref;
use vitrina_transport::error::ErrorKind as TransportErrorKind;

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Every strategy was attempted and every one of them failed.
    #[display("all download strategies failed: {_0}")]
    AllStrategiesFailed(#[error(not(source))] StrategyFailures),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AllStrategiesFailed(failures) => failures.iter().any(|f| f.cause.is_retryable()),
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The exchange completed with a non-success status.
    #[display("HTTP {_0}")]
    Status(u16),
    /// The request never completed.
    #[display("network error: {_0}")]
    Network(String),
    /// The body isn't valid JSON.
    #[display("invalid JSON: {_0}")]
    Parse(String),
    /// A proxy answered, but not with the envelope it's configured to use.
    #[display("malformed proxy envelope: {_0}")]
    Envelope(String),
    /// The file has no download link to try.
    #[display("no download link")]
    MissingLink,
}
impl FailureCause {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::Network(_) => true,
            Self::Parse(_) | Self::Envelope(_) | Self::MissingLink => false,
        }
    }
}
impl From<&TransportErrorKind> for FailureCause {
    fn from(kind: &TransportErrorKind) -> Self {
        match kind {
            TransportErrorKind::Status { status, .. } => Self::Status(*status),
            TransportErrorKind::Network { reason, .. } => Self::Network(reason.clone()),
            TransportErrorKind::Setup(reason) => Self::Network(reason.clone()),
        }
    }
}

/// The failure of one strategy, as recorded in
/// [`ErrorKind::AllStrategiesFailed`].
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{strategy}: {cause}")]
pub struct StrategyFailure {
    pub strategy: DescriptorStrategy,
    pub cause: FailureCause,
}

/// Strategy failures in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyFailures(pub Vec<StrategyFailure>);
impl Deref for StrategyFailures {
    type Target = [StrategyFailure];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl FmtDisplay for StrategyFailures {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_kind_display() {
        let failures = StrategyFailures(vec![
            StrategyFailure { strategy: DescriptorStrategy::ContentLink, cause: FailureCause::Status(403) },
            StrategyFailure { strategy: DescriptorStrategy::DownloadById, cause: FailureCause::MissingLink },
        ]);
        assert_eq!(
            ErrorKind::AllStrategiesFailed(failures).to_string(),
            "all download strategies failed: content-link: HTTP 403; download-by-id: no download link"
        );
    }

    #[rstest]
    #[case(FailureCause::Status(404), false)]
    #[case(FailureCause::Status(502), true)]
    #[case(FailureCause::Network("reset".to_string()), true)]
    #[case(FailureCause::Parse("eof".to_string()), false)]
    #[case(FailureCause::MissingLink, false)]
    fn failure_cause_retryable(#[case] cause: FailureCause, #[case] expected: bool) {
        assert_eq!(cause.is_retryable(), expected);
        let failure = StrategyFailure { strategy: DescriptorStrategy::AlternateClient, cause };
        assert_eq!(ErrorKind::AllStrategiesFailed(StrategyFailures(vec![failure])).is_retryable(), expected);
    }

    #[test]
    fn failure_cause_from_transport() {
        let status = TransportErrorKind::Status { url: "u".to_string(), status: 401 };
        assert_eq!(FailureCause::from(&status), FailureCause::Status(401));
        let network = TransportErrorKind::Network { url: "u".to_string(), reason: "timed out".to_string() };
        assert_eq!(FailureCause::from(&network), FailureCause::Network("timed out".to_string()));
    }
}
