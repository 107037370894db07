use std::fmt;
use std::str::FromStr;

use super::{IpAddress, IpFamily, NetError};

/// A network: base address plus prefix length.
///
/// The base address never has bits set past `prefix_len`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IpNetwork {
    base_address: IpAddress,
    prefix_len: u8,
}

impl IpNetwork {
    /// Build a network from an address already on a network boundary.
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<Self, NetError> {
        mask(address, prefix_len, false)
    }

    /// Build a network, clearing any host bits of `address`.
    pub fn new_masked(address: IpAddress, prefix_len: u8) -> Result<Self, NetError> {
        mask(address, prefix_len, true)
    }

    /// A single-host network (`/32` or `/128`).
    pub fn host(address: IpAddress) -> Self {
        Self {
            base_address: address,
            prefix_len: address.family().width(),
        }
    }

    pub fn base_address(&self) -> IpAddress {
        self.base_address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn family(&self) -> IpFamily {
        self.base_address.family()
    }

    pub fn contains(&self, address: &IpAddress) -> bool {
        contains(self, address)
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_address, self.prefix_len)
    }
}

impl FromStr for IpNetwork {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

/// Mask `address` to `prefix_len` bits.
///
/// Without `force`, an address with host bits set is rejected with
/// [`NetError::InvalidNetwork`]. With `force`, host bits are cleared. A prefix
/// wider than the address family always fails with [`NetError::InvalidPrefix`].
pub fn mask(address: IpAddress, prefix_len: u8, force: bool) -> Result<IpNetwork, NetError> {
    let family = address.family();
    let width = family.width();
    if prefix_len > width {
        return Err(NetError::InvalidPrefix {
            prefix: prefix_len,
            family,
        });
    }

    let bits = address.to_bits();
    let masked = bits & mask_bits(width, prefix_len);
    if masked != bits && !force {
        return Err(NetError::invalid_network(format!("{address}/{prefix_len}")));
    }

    Ok(IpNetwork {
        base_address: IpAddress::from_bits(family, masked),
        prefix_len,
    })
}

/// Parse a canonical `address/prefix` literal. Host bits are not cleared.
pub fn parse_cidr(text: &str) -> Result<IpNetwork, NetError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() != 2 {
        return Err(NetError::invalid_network(text));
    }

    let address = IpAddress::parse(parts[0]).map_err(|_| NetError::invalid_network(text))?;
    let prefix_len: u8 = parts[1]
        .parse()
        .map_err(|_| NetError::invalid_network(text))?;

    mask(address, prefix_len, false).map_err(|_| NetError::invalid_network(text))
}

/// True when `address` belongs to `network`. Families must match.
pub fn contains(network: &IpNetwork, address: &IpAddress) -> bool {
    if network.family() != address.family() {
        return false;
    }
    let width = network.family().width();
    address.to_bits() & mask_bits(width, network.prefix_len) == network.base_address.to_bits()
}

fn mask_bits(width: u8, prefix_len: u8) -> u128 {
    if prefix_len == 0 {
        return 0;
    }
    let all_ones = if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    };
    (all_ones << (width - prefix_len)) & all_ones
}
