use std::fmt;

use crate::net::IpAddress;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Mx,
    Cname,
    Txt,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
        };
        f.write_str(label)
    }
}

/// One decoded answer: an address (A/AAAA), a target name (MX/CNAME) or the
/// concatenated strings of a TXT record.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsValue {
    Address(IpAddress),
    Name(String),
    Text(String),
}

impl DnsValue {
    pub fn into_address(self) -> Option<IpAddress> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn into_name(self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
