use macaddr::MacAddr;
use measurements::{Power, Temperature};
use strum::EnumIter;

use super::board::BoardTelemetry;
use super::hashrate::HashRate;
use super::mining::MiningConfig;

/// One fetch worth of raw readings from a miner.
///
/// Everything the device did not report is `None`; consumers that need a
/// stable shape should go through the normalized snapshot instead of
/// reading this record directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinerTelemetry {
    /// The network hostname of the miner
    pub hostname: Option<String>,
    /// The MAC address of the miner
    pub mac: Option<MacAddr>,
    /// The manufacturer of the miner
    pub make: Option<String>,
    /// The model of the miner
    pub model: Option<String>,
    /// The firmware version of the miner
    pub firmware_version: Option<String>,
    /// Whether the device itself claims to be hashing.
    /// The snapshot publishes an inference from wattage and hashrate instead.
    pub is_mining: Option<bool>,
    /// The current hashrate of the miner
    pub hashrate: Option<HashRate>,
    /// The expected or factory hashrate of the miner
    pub expected_hashrate: Option<HashRate>,
    /// Per-hashboard readings, possibly empty
    pub hashboards: Vec<BoardTelemetry>,
    /// The average temperature across all boards in the miner
    pub average_temperature: Option<Temperature>,
    /// The current power consumption of the miner
    pub wattage: Option<Power>,
    /// The current power limit or power target of the miner
    pub wattage_limit: Option<Power>,
    /// The current efficiency in W/TH/s (J/TH) as reported by the device
    pub efficiency: Option<f64>,
    /// The mining configuration as last read back from the device
    pub config: Option<MiningConfig>,
}

/// The individual pieces of telemetry that can be requested from a session.
///
/// Sessions are free to satisfy several fields from one device command; the
/// set only tells them what the caller is going to read.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Copy, EnumIter)]
pub enum TelemetryField {
    /// Hostname assigned to the miner.
    Hostname,
    /// MAC address of the miner.
    Mac,
    /// Manufacturer name.
    Make,
    /// Model name.
    Model,
    /// Firmware version of the miner.
    FirmwareVersion,
    /// The device's own report of whether it is hashing.
    IsMining,
    /// Current hashrate reported by the miner.
    Hashrate,
    /// Expected or factory hashrate.
    ExpectedHashrate,
    /// Per-hashboard readings (temperatures, hashrate).
    Hashboards,
    /// Average temperature across the boards.
    AverageTemperature,
    /// Current power consumption in watts.
    Wattage,
    /// Configured power limit in watts.
    WattageLimit,
    /// Efficiency of the miner (e.g., J/TH).
    Efficiency,
    /// Mining configuration, including the active mode and preset.
    Config,
}
