use thiserror::Error;

use super::IpFamily;

/// Errors raised while parsing or masking addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("invalid IP address: {value}")]
    InvalidAddress { value: String },
    #[error("invalid network: {value}")]
    InvalidNetwork { value: String },
    #[error("prefix length {prefix} exceeds the {family} address width")]
    InvalidPrefix { prefix: u8, family: IpFamily },
}

impl NetError {
    pub(crate) fn invalid_address(value: impl Into<String>) -> Self {
        Self::InvalidAddress {
            value: value.into(),
        }
    }

    pub(crate) fn invalid_network(value: impl Into<String>) -> Self {
        Self::InvalidNetwork {
            value: value.into(),
        }
    }
}
