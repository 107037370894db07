use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::NetError;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Number of bits in an address of this family.
    pub fn width(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

/// An IPv4 or IPv6 address. Renders as dotted-decimal or colon-hex.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IpAddress(IpAddr);

impl IpAddress {
    pub fn new(addr: IpAddr) -> Self {
        Self(addr)
    }

    pub fn parse(text: &str) -> Result<Self, NetError> {
        text.trim()
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| NetError::invalid_address(text))
    }

    pub fn family(&self) -> IpFamily {
        match self.0 {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.family() == IpFamily::V4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family() == IpFamily::V6
    }

    /// Raw bytes in network order (4 or 16 bytes).
    pub fn octets(&self) -> Vec<u8> {
        match self.0 {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        }
    }

    pub fn as_ip_addr(&self) -> IpAddr {
        self.0
    }

    /// Address bits right-aligned in a `u128`; IPv4 uses the low 32 bits.
    pub(crate) fn to_bits(self) -> u128 {
        match self.0 {
            IpAddr::V4(v4) => u128::from(u32::from(v4)),
            IpAddr::V6(v6) => u128::from(v6),
        }
    }

    pub(crate) fn from_bits(family: IpFamily, bits: u128) -> Self {
        match family {
            IpFamily::V4 => Self(IpAddr::V4(Ipv4Addr::from(bits as u32))),
            IpFamily::V6 => Self(IpAddr::V6(Ipv6Addr::from(bits))),
        }
    }

    /// Label form used under `in-addr.arpa` / `ip6.arpa`, most significant first.
    ///
    /// IPv4 stays dotted-decimal; IPv6 is spelled out as 32 dot-separated nibbles.
    pub fn to_dotted(&self) -> String {
        match self.0 {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(_) => nibbles(self.to_bits())
                .iter()
                .map(|nibble| format!("{nibble:x}"))
                .collect::<Vec<_>>()
                .join("."),
        }
    }

    /// Same labels as [`IpAddress::to_dotted`], least significant first.
    pub fn to_reverse_dotted(&self) -> String {
        match self.0 {
            IpAddr::V4(v4) => {
                let octets = v4.octets();
                format!("{}.{}.{}.{}", octets[3], octets[2], octets[1], octets[0])
            }
            IpAddr::V6(_) => nibbles(self.to_bits())
                .iter()
                .rev()
                .map(|nibble| format!("{nibble:x}"))
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

// Rendered as lowercase hex; DNS labels compare case-insensitively.
fn nibbles(bits: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (idx, slot) in out.iter_mut().enumerate() {
        let shift = 124 - idx * 4;
        *slot = ((bits >> shift) & 0xf) as u8;
    }
    out
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for IpAddress {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        Self(addr)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        Self(IpAddr::V6(addr))
    }
}

impl From<IpAddress> for IpAddr {
    fn from(addr: IpAddress) -> Self {
        addr.0
    }
}
