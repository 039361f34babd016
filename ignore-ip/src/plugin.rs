//! Ignore plugin interface for the host's plugin manager

use crate::destination::{Destination, DestinationProvider};
use crate::rule::ignore_matches;
use tracing::trace;

/// Trait for plugins deciding whether a destination bypasses the proxy
pub trait IgnorePlugin: Send + Sync {
    /// Name the plugin is registered under
    fn name(&self) -> &'static str;

    /// Check whether `destination` matches one ignore rule
    fn ignore(&self, destination: &dyn DestinationProvider, rule: &str) -> bool;
}

/// Matches IP literals, networks and address:port rules
#[derive(Debug, Clone, Copy, Default)]
pub struct IpIgnorePlugin;

impl IgnorePlugin for IpIgnorePlugin {
    fn name(&self) -> &'static str {
        "ignore_ip"
    }

    fn ignore(&self, destination: &dyn DestinationProvider, rule: &str) -> bool {
        match Destination::from_provider(destination) {
            Some(dest) => ignore_matches(rule, &dest),
            None => {
                trace!(rule, "Destination has no resolved address");
                false
            }
        }
    }
}
