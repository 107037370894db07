use std::fmt;

use super::{SpfEntry, SpfPrefix};
use crate::net::{IpAddress, IpNetwork, NetError, parse_cidr};

/// Disposition of the terminal `all` mechanism.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpfAction {
    Pass,
    Fail,
    SoftFail,
    #[default]
    Neutral,
}

impl SpfAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::SoftFail => "softfail",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SpfAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved address and where it came from.
///
/// `source` is the record's source domain for `ip4`/`ip6` literals, and
/// `"<host> <token>"` for addresses obtained through `a`/`mx`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfIpAddress {
    source: String,
    address: IpAddress,
}

impl SpfIpAddress {
    pub(crate) fn new(source: impl Into<String>, address: IpAddress) -> Self {
        Self {
            source: source.into(),
            address,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn address(&self) -> IpAddress {
        self.address
    }

    pub fn to_network(&self, prefix_len: u8) -> Result<SpfIpNetwork, NetError> {
        let network = IpNetwork::new(self.address, prefix_len)?;
        Ok(SpfIpNetwork::new(self.source.clone(), network))
    }
}

impl fmt::Display for SpfIpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}

/// A resolved network and where it came from.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfIpNetwork {
    source: String,
    network: IpNetwork,
}

impl SpfIpNetwork {
    pub(crate) fn new(source: impl Into<String>, network: IpNetwork) -> Self {
        Self {
            source: source.into(),
            network,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn network(&self) -> IpNetwork {
        self.network
    }

    pub fn contains(&self, address: &IpAddress) -> bool {
        self.network.contains(address)
    }
}

impl fmt::Display for SpfIpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.network, f)
    }
}

/// Non-fatal conditions met while expanding a record.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpfIssue {
    /// `include`/`redirect` target already parsed in this resolution.
    CycleDetected { domain: String },
    DepthExceeded { domain: String, depth: usize },
    LookupFailed { target: String, message: String },
    MalformedInclude { domain: String, message: String },
    /// `include`/`redirect` target publishes no SPF record.
    MissingRecord { domain: String },
}

impl fmt::Display for SpfIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { domain } => write!(f, "cycle detected at {domain}"),
            Self::DepthExceeded { domain, depth } => {
                write!(f, "depth {depth} exceeded before {domain}")
            }
            Self::LookupFailed { target, message } => {
                write!(f, "lookup failed for {target}: {message}")
            }
            Self::MalformedInclude { domain, message } => {
                write!(f, "malformed record at {domain}: {message}")
            }
            Self::MissingRecord { domain } => write!(f, "no SPF record at {domain}"),
        }
    }
}

/// One parsed SPF TXT record.
///
/// Built during a single parse pass and never mutated afterwards.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    domain: String,
    source: String,
    raw: String,
    version: String,
    depth: usize,
    final_action: SpfAction,
    entries: Vec<SpfEntry>,
    ip_addresses: Vec<SpfIpAddress>,
    ip_networks: Vec<SpfIpNetwork>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    explanation: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Vec::is_empty"))]
    issues: Vec<SpfIssue>,
}

impl SpfRecord {
    pub(crate) fn new(
        domain: impl Into<String>,
        source: impl Into<String>,
        raw: impl Into<String>,
        depth: usize,
    ) -> Self {
        Self {
            domain: domain.into(),
            source: source.into(),
            raw: raw.into(),
            version: "spf1".to_string(),
            depth,
            final_action: SpfAction::default(),
            entries: Vec::new(),
            ip_addresses: Vec::new(),
            ip_networks: Vec::new(),
            explanation: None,
            issues: Vec::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn final_action(&self) -> SpfAction {
        self.final_action
    }

    pub fn entries(&self) -> &[SpfEntry] {
        &self.entries
    }

    pub fn ip_addresses(&self) -> &[SpfIpAddress] {
        &self.ip_addresses
    }

    pub fn ip_networks(&self) -> &[SpfIpNetwork] {
        &self.ip_networks
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn issues(&self) -> &[SpfIssue] {
        &self.issues
    }

    pub fn entries_with(&self, prefix: SpfPrefix) -> impl Iterator<Item = &SpfEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.prefix() == prefix)
    }

    pub fn has_invalid_entries(&self) -> bool {
        self.entries.iter().any(|entry| entry.prefix().is_invalid())
    }

    /// True when `address` is one of this record's addresses or inside one of
    /// its networks. Records produced by `include`/`redirect` are not consulted.
    pub fn contains(&self, address: &IpAddress) -> bool {
        self.ip_addresses
            .iter()
            .any(|known| known.address() == *address)
            || self
                .ip_networks
                .iter()
                .any(|network| network.contains(address))
    }

    pub(crate) fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub(crate) fn set_final_action(&mut self, action: SpfAction) {
        self.final_action = action;
    }

    pub(crate) fn set_explanation(&mut self, explanation: String) {
        self.explanation.get_or_insert(explanation);
    }

    pub(crate) fn push_entry(&mut self, prefix: SpfPrefix, value: impl Into<String>) {
        let entry = SpfEntry::new(self.domain.clone(), self.source.clone(), prefix, value);
        self.entries.push(entry);
    }

    pub(crate) fn push_address(&mut self, address: SpfIpAddress) {
        self.ip_addresses.push(address);
    }

    pub(crate) fn push_network(&mut self, network: SpfIpNetwork) {
        self.ip_networks.push(network);
    }

    pub(crate) fn push_issue(&mut self, issue: SpfIssue) {
        self.issues.push(issue);
    }

    /// Parse the `ip4`/`ip6` literals collected so far.
    ///
    /// A literal that does not parse, or that belongs to the other address
    /// family, has its entry retagged as an invalid marker.
    pub(crate) fn resolve_literals(&mut self) {
        let mut addresses = Vec::new();
        let mut networks = Vec::new();

        for entry in &mut self.entries {
            let family_prefix = entry.prefix();
            if !matches!(family_prefix, SpfPrefix::Ip4 | SpfPrefix::Ip6) {
                continue;
            }
            let expects_v4 = family_prefix == SpfPrefix::Ip4;

            if entry.value().contains('/') {
                match parse_cidr(entry.value()) {
                    Ok(network) if network.base_address().is_ipv4() == expects_v4 => {
                        networks.push(SpfIpNetwork::new(self.source.clone(), network));
                    }
                    _ => {
                        spf_warn!("invalid network {} in {}", entry.value(), self.source);
                        entry.mark(SpfPrefix::InvalidNetwork);
                    }
                }
            } else {
                match IpAddress::parse(entry.value()) {
                    Ok(address) if address.is_ipv4() == expects_v4 => {
                        addresses.push(SpfIpAddress::new(self.source.clone(), address));
                    }
                    _ => {
                        spf_warn!("invalid address {} in {}", entry.value(), self.source);
                        entry.mark(SpfPrefix::InvalidAddress);
                    }
                }
            }
        }

        self.ip_addresses.extend(addresses);
        self.ip_networks.extend(networks);
    }
}

impl fmt::Display for SpfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source: {} Record: {}", self.source, self.raw)
    }
}
