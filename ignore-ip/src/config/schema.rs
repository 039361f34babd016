//! Configuration schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ports: PortConfig,
}

/// Default ports keyed by URL scheme
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "BTreeMap<String, u16>", into = "BTreeMap<String, u16>")]
pub struct PortConfig {
    schemes: BTreeMap<String, u16>,
}

impl From<BTreeMap<String, u16>> for PortConfig {
    fn from(schemes: BTreeMap<String, u16>) -> Self {
        let mut ports = PortConfig::default();
        for (scheme, port) in schemes {
            ports.insert(&scheme, port);
        }
        ports
    }
}

impl From<PortConfig> for BTreeMap<String, u16> {
    fn from(ports: PortConfig) -> Self {
        ports.schemes
    }
}

impl PortConfig {
    /// Default port for a scheme, matched case-insensitively
    pub fn default_port(&self, scheme: &str) -> Option<u16> {
        self.schemes.get(&scheme.to_ascii_lowercase()).copied()
    }

    pub fn insert(&mut self, scheme: &str, port: u16) {
        self.schemes.insert(scheme.to_ascii_lowercase(), port);
    }

    /// Overlay `other` on top of these entries
    pub fn extend(&mut self, other: PortConfig) {
        for (scheme, port) in other.schemes {
            self.insert(&scheme, port);
        }
    }
}
