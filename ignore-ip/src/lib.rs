//! IP ignore-rule matching for proxy bypass lists
//!
//! Decides whether a resolved destination matches a single ignore rule
//! written as a bare address, a network (`addr/prefix` or `addr/netmask`)
//! or an `address:port` pair.

pub mod address;
pub mod config;
pub mod destination;
pub mod error;
pub mod plugin;
pub mod rule;

// Re-export commonly used types
pub use address::{Address, Family, Netmask};
pub use config::{Config, ConfigLoader, PortConfig};
pub use destination::{Destination, DestinationProvider, UrlDestination};
pub use error::{IgnoreError, Result};
pub use plugin::{IgnorePlugin, IpIgnorePlugin};
pub use rule::{ignore_matches, IgnoreRule};
