use std::fmt;

/// Tag carried by an [`SpfEntry`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpfPrefix {
    Ip4,
    Ip6,
    A,
    Mx,
    Include,
    Redirect,
    Exists,
    Ptr,
    Exp,
    /// An `ip4`/`ip6` CIDR or an `a`/`mx` mask that could not be used.
    InvalidNetwork,
    /// An `ip4`/`ip6` address literal that does not parse.
    InvalidAddress,
}

impl SpfPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ip4 => "ip4",
            Self::Ip6 => "ip6",
            Self::A => "a",
            Self::Mx => "mx",
            Self::Include => "include",
            Self::Redirect => "redirect",
            Self::Exists => "exists",
            Self::Ptr => "ptr",
            Self::Exp => "exp",
            Self::InvalidNetwork => "InvalidNetwork",
            Self::InvalidAddress => "InvalidAddress",
        }
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, Self::InvalidNetwork | Self::InvalidAddress)
    }
}

impl fmt::Display for SpfPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mechanism or modifier occurrence.
///
/// `domain` is the domain under evaluation, `source` the domain whose TXT
/// record declared the occurrence.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfEntry {
    domain: String,
    source: String,
    prefix: SpfPrefix,
    value: String,
}

impl SpfEntry {
    pub(crate) fn new(
        domain: impl Into<String>,
        source: impl Into<String>,
        prefix: SpfPrefix,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            source: source.into(),
            prefix,
            value: value.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn prefix(&self) -> SpfPrefix {
        self.prefix
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn mark(&mut self, prefix: SpfPrefix) {
        self.prefix = prefix;
    }
}

impl fmt::Display for SpfEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.value)
    }
}
