//! Destinations that ignore rules are checked against

use crate::address::Address;
use crate::config::PortConfig;
use crate::error::{IgnoreError, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::debug;
use url::{Host, Url};

/// Source of a destination address and port.
///
/// Implementations must not perform DNS lookups: `resolved_address` returns
/// only an address that is already known.
pub trait DestinationProvider {
    /// Address of the destination, if already resolved
    fn resolved_address(&self) -> Option<IpAddr>;

    /// Destination port, 0 when there is none
    fn port(&self) -> u16;
}

/// A resolved destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    pub address: Address,
    pub port: u16,
}

impl Destination {
    pub fn new(address: impl Into<Address>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Snapshot a provider, or `None` if it has no resolved address
    pub fn from_provider(provider: &dyn DestinationProvider) -> Option<Self> {
        provider
            .resolved_address()
            .map(|address| Self::new(address, provider.port()))
    }
}

impl From<SocketAddr> for Destination {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SocketAddr::new(self.address.into(), self.port))
    }
}

impl DestinationProvider for Destination {
    fn resolved_address(&self) -> Option<IpAddr> {
        Some(self.address.into())
    }

    fn port(&self) -> u16 {
        self.port
    }
}

impl DestinationProvider for SocketAddr {
    fn resolved_address(&self) -> Option<IpAddr> {
        Some(self.ip())
    }

    fn port(&self) -> u16 {
        SocketAddr::port(self)
    }
}

/// A URL destination whose address is known only when the host is an IP
/// literal
#[derive(Debug, Clone)]
pub struct UrlDestination {
    url: Url,
    address: Option<IpAddr>,
    port: u16,
}

impl UrlDestination {
    /// Parse a URL, taking the port from the URL, `ports`, or the scheme's
    /// well-known default, in that order
    pub fn parse(input: &str, ports: &PortConfig) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| IgnoreError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        let address = match url.host() {
            Some(Host::Ipv4(addr)) => Some(IpAddr::V4(addr)),
            Some(Host::Ipv6(addr)) => Some(IpAddr::V6(addr)),
            // Non-special schemes keep IPv4 literals as opaque host text
            Some(Host::Domain(domain)) => domain.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
            None => {
                return Err(IgnoreError::InvalidUrl {
                    url: input.to_string(),
                    reason: "missing host".to_string(),
                })
            }
        };

        let port = url
            .port()
            .or_else(|| ports.default_port(url.scheme()))
            .or_else(|| url.port_or_known_default())
            .ok_or_else(|| IgnoreError::UnknownScheme {
                scheme: url.scheme().to_string(),
            })?;

        if address.is_none() {
            debug!(url = %url, "Host is not an IP literal, no address without DNS");
        }

        Ok(Self { url, address, port })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

impl DestinationProvider for UrlDestination {
    fn resolved_address(&self) -> Option<IpAddr> {
        self.address
    }

    fn port(&self) -> u16 {
        self.port
    }
}
