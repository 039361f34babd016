//! Literal address and netmask parsing

use ipnet::{Ipv4Net, Ipv6Net};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Width of an address of this family in bits
    pub const fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IPv4 or IPv6 address held as network-order bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    V4([u8; 4]),
    V6([u8; 16]),
}

impl Address {
    /// Parse a literal address, trying IPv4 before IPv6.
    ///
    /// Returns `None` if the token is not a literal of either family.
    /// Hostnames are never resolved.
    pub fn parse(token: &str) -> Option<Self> {
        if let Ok(v4) = token.parse::<Ipv4Addr>() {
            return Some(v4.into());
        }
        token.parse::<Ipv6Addr>().ok().map(Self::from)
    }

    pub const fn family(&self) -> Family {
        match self {
            Address::V4(_) => Family::V4,
            Address::V6(_) => Family::V6,
        }
    }

    pub fn octets(&self) -> &[u8] {
        match self {
            Address::V4(bytes) => bytes,
            Address::V6(bytes) => bytes,
        }
    }

    /// Compare two addresses under a netmask.
    ///
    /// All three values must share a family, otherwise the comparison fails.
    pub fn masked_eq(&self, other: &Address, mask: &Netmask) -> bool {
        match (self, other, &mask.0) {
            (Address::V4(a), Address::V4(b), Address::V4(m)) => masked_bytes_eq(a, b, m),
            (Address::V6(a), Address::V6(b), Address::V6(m)) => masked_bytes_eq(a, b, m),
            _ => false,
        }
    }
}

fn masked_bytes_eq(a: &[u8], b: &[u8], mask: &[u8]) -> bool {
    a.iter()
        .zip(b)
        .zip(mask)
        .all(|((a, b), m)| a & m == b & m)
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::V4(addr.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::V6(addr.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> Self {
        match addr {
            Address::V4(bytes) => IpAddr::V4(Ipv4Addr::from(bytes)),
            Address::V6(bytes) => IpAddr::V6(Ipv6Addr::from(bytes)),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", IpAddr::from(*self))
    }
}

/// A netmask laid out like an [`Address`] of the same family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Netmask(Address);

impl Netmask {
    /// Build the mask for a CIDR prefix length.
    ///
    /// Prefixes wider than the family are clamped to the full width.
    pub fn from_prefix(family: Family, prefix: u32) -> Self {
        let len = prefix.min(u32::from(family.bits())) as u8;
        match family {
            Family::V4 => Netmask(
                Ipv4Net::new(Ipv4Addr::UNSPECIFIED, len)
                    .map_or(Ipv4Addr::BROADCAST, |net| net.netmask())
                    .into(),
            ),
            Family::V6 => Netmask(
                Ipv6Net::new(Ipv6Addr::UNSPECIFIED, len)
                    .map_or(Ipv6Addr::from(u128::MAX), |net| net.netmask())
                    .into(),
            ),
        }
    }

    /// Use a literal address (`255.255.0.0`, `ffff:ffff::`) as the mask
    pub const fn from_address(mask: Address) -> Self {
        Netmask(mask)
    }

    pub const fn family(&self) -> Family {
        self.0.family()
    }

    pub fn octets(&self) -> &[u8] {
        self.0.octets()
    }
}

impl fmt::Display for Netmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
