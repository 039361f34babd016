//! Ignore rule classification and matching

use crate::address::{Address, Family, Netmask};
use crate::destination::Destination;
use std::fmt;
use tracing::trace;

/// One ignore rule, classified by grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreRule {
    /// `192.168.1.5`, `::1`
    Address(Address),
    /// `10.0.0.0/8`, `10.0.0.0/255.0.0.0`, `fd00::/8`
    Network { network: Address, mask: Netmask },
    /// `192.168.1.5:8080`, `[::1]:80`
    AddressPort { address: Address, port: u16 },
}

impl IgnoreRule {
    /// Classify a rule.
    ///
    /// Grammars are tried in order (bare address, network, address:port)
    /// and the first one that parses wins. `None` means the rule is not an
    /// IP rule at all.
    pub fn parse(rule: &str) -> Option<Self> {
        Self::parse_address(rule)
            .or_else(|| Self::parse_network(rule))
            .or_else(|| Self::parse_address_port(rule))
    }

    fn parse_address(rule: &str) -> Option<Self> {
        Address::parse(rule).map(Self::Address)
    }

    fn parse_network(rule: &str) -> Option<Self> {
        let (left, right) = rule.split_once('/')?;
        let network = Address::parse(left)?;

        let mask = match Address::parse(right) {
            Some(mask) if mask.family() == network.family() => Netmask::from_address(mask),
            Some(mask) => {
                trace!(
                    rule,
                    network = %network.family(),
                    mask = %mask.family(),
                    "Netmask family differs from network"
                );
                return None;
            }
            None => Netmask::from_prefix(network.family(), parse_prefix_len(right)?),
        };

        Some(Self::Network { network, mask })
    }

    fn parse_address_port(rule: &str) -> Option<Self> {
        let (host, port) = rule.rsplit_once(':')?;
        let port = parse_decimal(port)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|&p| p > 0)?;

        let address = match host.strip_prefix('[') {
            // Brackets only ever wrap an IPv6 literal
            Some(inner) => Address::parse(inner.strip_suffix(']')?)
                .filter(|address| address.family() == Family::V6)?,
            None => {
                let address = Address::parse(host)?;
                // Without brackets the colons belong to an IPv6 literal, not a port
                if address.family() == Family::V6 {
                    trace!(rule, "Unbracketed IPv6 address is not an address:port rule");
                    return None;
                }
                address
            }
        };

        Some(Self::AddressPort { address, port })
    }

    /// Check a destination against this rule
    pub fn matches(&self, destination: &Destination) -> bool {
        match *self {
            Self::Address(address) => destination.address == address,
            Self::Network { network, mask } => destination.address.masked_eq(&network, &mask),
            Self::AddressPort { address, port } => {
                // Port 0 is "no port" and never matches a port constraint
                port != 0 && destination.port == port && destination.address == address
            }
        }
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{}", address),
            Self::Network { network, mask } => write!(f, "{}/{}", network, mask),
            Self::AddressPort { address, port } => match address.family() {
                Family::V4 => write!(f, "{}:{}", address, port),
                Family::V6 => write!(f, "[{}]:{}", address, port),
            },
        }
    }
}

/// Decide whether `destination` matches a single ignore rule.
///
/// Malformed rules never match. The rule is re-parsed on every call.
pub fn ignore_matches(rule: &str, destination: &Destination) -> bool {
    let Some(parsed) = IgnoreRule::parse(rule) else {
        trace!(rule, "Not an IP ignore rule");
        return false;
    };

    let matched = parsed.matches(destination);
    trace!(rule, %parsed, %destination, matched, "Evaluated ignore rule");
    matched
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Unsigned decimal digits only.
///
/// Stricter than a `scanf`-style read: a sign, surrounding whitespace or
/// trailing text (`24abc`, `80x`) rejects the suffix instead of being
/// skipped.
fn parse_decimal(text: &str) -> Option<u32> {
    is_decimal(text).then(|| text.parse().ok()).flatten()
}

/// Prefix lengths too large for `u32` still clamp to the family width
fn parse_prefix_len(text: &str) -> Option<u32> {
    is_decimal(text).then(|| text.parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(addr: &str, port: u16) -> Destination {
        Destination::new(Address::parse(addr).unwrap(), port)
    }

    #[test]
    fn test_bare_address() {
        assert!(ignore_matches("192.168.1.5", &dest("192.168.1.5", 80)));
        assert!(!ignore_matches("192.168.1.5", &dest("192.168.1.6", 80)));
        assert!(ignore_matches("::1", &dest("::1", 80)));
        assert!(ignore_matches("::1", &dest("::1", 0)));
    }

    #[test]
    fn test_cidr_network() {
        assert!(ignore_matches("192.168.1.0/24", &dest("192.168.1.77", 443)));
        assert!(!ignore_matches("192.168.1.0/24", &dest("192.168.2.1", 443)));
        assert!(ignore_matches("fd00::/8", &dest("fd12:3456::1", 0)));
        assert!(!ignore_matches("fd00::/8", &dest("fe80::1", 0)));
    }

    #[test]
    fn test_netmask_network() {
        assert!(ignore_matches("10.0.0.0/255.0.0.0", &dest("10.200.1.1", 22)));
        assert!(!ignore_matches("10.0.0.0/255.0.0.0", &dest("11.0.0.1", 22)));
        assert!(ignore_matches("2001:db8::/ffff:ffff::", &dest("2001:db8:1::5", 22)));
    }

    #[test]
    fn test_prefix_boundaries() {
        assert!(ignore_matches("1.2.3.4/0", &dest("200.100.50.25", 0)));
        assert!(ignore_matches("1.2.3.4/32", &dest("1.2.3.4", 0)));
        assert!(!ignore_matches("1.2.3.4/32", &dest("1.2.3.5", 0)));
        assert!(ignore_matches("::/0", &dest("2001:db8::1", 0)));
    }

    #[test]
    fn test_oversized_prefix_clamped() {
        assert_eq!(
            IgnoreRule::parse("10.0.0.1/99"),
            IgnoreRule::parse("10.0.0.1/32")
        );
        assert!(ignore_matches("10.0.0.1/4294967296", &dest("10.0.0.1", 0)));
        assert!(!ignore_matches("10.0.0.1/4294967296", &dest("10.0.0.2", 0)));
    }

    #[test]
    fn test_mixed_family_network_rejected() {
        assert_eq!(IgnoreRule::parse("10.0.0.0/ffff::"), None);
        assert_eq!(IgnoreRule::parse("::/255.0.0.0"), None);
        assert!(!ignore_matches("10.0.0.0/ffff::", &dest("10.0.0.1", 0)));
    }

    #[test]
    fn test_network_family_mismatch_with_destination() {
        assert!(!ignore_matches("0.0.0.0/0", &dest("::1", 0)));
        assert!(!ignore_matches("::/0", &dest("127.0.0.1", 0)));
    }

    #[test]
    fn test_malformed_network() {
        assert_eq!(IgnoreRule::parse("10.0.0.0/"), None);
        assert_eq!(IgnoreRule::parse("10.0.0.0/abc"), None);
        assert_eq!(IgnoreRule::parse("10.0.0.0/-8"), None);
        assert_eq!(IgnoreRule::parse("example.com/8"), None);
    }

    #[test]
    fn test_address_port() {
        assert!(ignore_matches("192.168.1.5:8080", &dest("192.168.1.5", 8080)));
        assert!(!ignore_matches("192.168.1.5:8080", &dest("192.168.1.5", 80)));
        assert!(!ignore_matches("192.168.1.5:8080", &dest("192.168.1.6", 8080)));
    }

    #[test]
    fn test_bracketed_ipv6_port() {
        assert_eq!(
            IgnoreRule::parse("[::1]:80"),
            Some(IgnoreRule::AddressPort {
                address: Address::parse("::1").unwrap(),
                port: 80,
            })
        );
        assert!(ignore_matches("[::1]:80", &dest("::1", 80)));
        assert!(!ignore_matches("[::1]:80", &dest("::1", 443)));
    }

    #[test]
    fn test_unbracketed_ipv6_port_rejected() {
        // Nine groups: not a bare address, and the prefix is an unbracketed IPv6
        assert_eq!(IgnoreRule::parse("1:2:3:4:5:6:7:8:80"), None);
        assert!(!ignore_matches("1:2:3:4:5:6:7:8:80", &dest("1:2:3:4:5:6:7:8", 80)));
    }

    #[test]
    fn test_port_zero_never_matches() {
        assert_eq!(IgnoreRule::parse("192.168.1.5:0"), None);
        assert!(!ignore_matches("192.168.1.5:0", &dest("192.168.1.5", 0)));
        assert!(!ignore_matches("192.168.1.5:8080", &dest("192.168.1.5", 0)));

        let rule = IgnoreRule::AddressPort {
            address: Address::parse("192.168.1.5").unwrap(),
            port: 0,
        };
        assert!(!rule.matches(&dest("192.168.1.5", 0)));
    }

    #[test]
    fn test_malformed_port() {
        assert_eq!(IgnoreRule::parse("192.168.1.5:"), None);
        assert_eq!(IgnoreRule::parse("192.168.1.5:http"), None);
        assert_eq!(IgnoreRule::parse("192.168.1.5:70000"), None);
        assert_eq!(IgnoreRule::parse("192.168.1.5: 80"), None);
        assert_eq!(IgnoreRule::parse("192.168.1.5:+80"), None);
        assert_eq!(IgnoreRule::parse("10.0.0.1:80x"), None);
        assert_eq!(IgnoreRule::parse("10.0.0.0/24abc"), None);
        assert_eq!(IgnoreRule::parse("10.0.0.0/ 24"), None);
    }

    #[test]
    fn test_bracketed_ipv4_port_rejected() {
        assert_eq!(IgnoreRule::parse("[10.0.0.1]:80"), None);
        assert!(!ignore_matches("[10.0.0.1]:80", &dest("10.0.0.1", 80)));
        assert_eq!(IgnoreRule::parse("[::1:80"), None);
    }

    #[test]
    fn test_grammar_priority() {
        // A valid IPv6 literal wins over the address:port reading
        assert!(matches!(
            IgnoreRule::parse("fe80::1:8080"),
            Some(IgnoreRule::Address(_))
        ));
    }

    #[test]
    fn test_non_ip_rules() {
        for rule in ["", "*.example.com", "localhost", "<local>", "[::1]", "example.com:80"] {
            assert_eq!(IgnoreRule::parse(rule), None, "rule {:?}", rule);
            assert!(!ignore_matches(rule, &dest("127.0.0.1", 80)));
        }
    }

    #[test]
    fn test_display() {
        let cases = [
            ("10.0.0.0/8", "10.0.0.0/255.0.0.0"),
            ("[::1]:80", "[::1]:80"),
            ("10.0.0.1:443", "10.0.0.1:443"),
            ("::1", "::1"),
        ];
        for (rule, shown) in cases {
            assert_eq!(IgnoreRule::parse(rule).unwrap().to_string(), shown);
        }
    }
}
