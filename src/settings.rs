use std::net::IpAddr;

use serde::Deserialize;

use crate::data::snapshot::PowerLimitRange;

/// Settings for one monitored miner.
///
/// Credentials are all optional; at session time an unset credential binds
/// as the empty string, which is what stock firmware ships with.
#[derive(Debug, Clone, Deserialize)]
pub struct MinerSettings {
    /// Address the device is reachable at.
    pub address: IpAddr,
    /// Display name used in log output. Falls back to the address.
    #[serde(default)]
    pub title: Option<String>,
    /// Password for the device's RPC interface.
    #[serde(default)]
    pub rpc_password: Option<String>,
    /// Username for the device's web interface.
    #[serde(default)]
    pub web_username: Option<String>,
    /// Password for the device's web interface.
    #[serde(default)]
    pub web_password: Option<String>,
    /// Username for the device's SSH service.
    #[serde(default)]
    pub ssh_username: Option<String>,
    /// Password for the device's SSH service.
    #[serde(default)]
    pub ssh_password: Option<String>,
    /// Lower bound for the power limit control, in watts.
    #[serde(default = "default_min_power")]
    pub min_power: u32,
    /// Upper bound for the power limit control, in watts.
    #[serde(default = "default_max_power")]
    pub max_power: u32,
}

fn default_min_power() -> u32 {
    1800
}

fn default_max_power() -> u32 {
    6000
}

impl MinerSettings {
    /// Settings with nothing but an address: no credentials, default bounds.
    pub fn for_address(address: IpAddr) -> Self {
        Self {
            address,
            title: None,
            rpc_password: None,
            web_username: None,
            web_password: None,
            ssh_username: None,
            ssh_password: None,
            min_power: default_min_power(),
            max_power: default_max_power(),
        }
    }

    /// The name this miner goes by in logs.
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.address.to_string())
    }

    /// The configured bounds for the power limit control.
    pub fn power_limit_range(&self) -> PowerLimitRange {
        PowerLimitRange {
            min: self.min_power,
            max: self.max_power,
        }
    }
}
