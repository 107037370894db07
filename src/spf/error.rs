use std::fmt;

use thiserror::Error;

use crate::dns::ResolutionError;

/// Errors raised while resolving an SPF policy.
#[derive(Debug, Error)]
pub enum SpfError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("malformed SPF record ({reason}): {record}")]
    Malformed {
        record: String,
        reason: MalformedReason,
    },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    TooFewTokens,
    InvalidVersion { version: Option<String> },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTokens => f.write_str("too few tokens"),
            Self::InvalidVersion { version: Some(version) } => {
                write!(f, "unsupported version {version}")
            }
            Self::InvalidVersion { version: None } => f.write_str("missing version"),
        }
    }
}

impl SpfError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn malformed(record: impl Into<String>, reason: MalformedReason) -> Self {
        Self::Malformed {
            record: record.into(),
            reason,
        }
    }
}
