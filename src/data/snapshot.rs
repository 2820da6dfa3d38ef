use std::collections::BTreeMap;
use std::net::IpAddr;

use macaddr::MacAddr;
use measurements::Power;
use serde::{Serialize, Serializer};

use super::board::BoardTelemetry;
use super::hashrate::HashRate;
use super::mining::MiningConfig;
use super::telemetry::MinerTelemetry;

/// Nudge added to a zero hashrate so the efficiency division stays finite.
const ZERO_HASHRATE_EPSILON: f64 = 0.01;

/// Consumption above this many watts means the hash chips are powered,
/// as opposed to just the control board idling.
const MINING_WATTAGE_THRESHOLD: f64 = 50.0;

/// Bounds for the device's power limit control, in watts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerLimitRange {
    pub min: u32,
    pub max: u32,
}

/// Device-level sensor values of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinerSensors {
    /// Hashrate rounded to two decimals, in the device's reporting unit
    pub hashrate: Option<f64>,
    /// Expected or factory hashrate, rounded the same way
    pub ideal_hashrate: Option<f64>,
    /// Name of the active tuning preset, when the device exposes one
    pub active_preset_name: Option<String>,
    /// Average board temperature in celsius
    pub temperature: Option<f64>,
    /// Configured power limit in watts
    pub power_limit: Option<f64>,
    /// Measured power consumption in watts
    pub miner_consumption: Option<f64>,
    /// Efficiency in J/TH as reported by the device itself
    pub efficiency: Option<f64>,
    /// Hottest chip temperature across all boards, in celsius.
    /// Seeded at zero, so sub-zero readings never surface here.
    pub max_chip_temperature: f64,
    /// Efficiency in J/TH derived from consumption and hashrate
    pub derived_efficiency: Option<f64>,
}

impl MinerSensors {
    /// The zero-valued sensor group published while the device is offline.
    pub fn zeroed() -> Self {
        Self {
            hashrate: Some(0.0),
            ideal_hashrate: Some(0.0),
            active_preset_name: None,
            temperature: Some(0.0),
            power_limit: Some(0.0),
            miner_consumption: Some(0.0),
            efficiency: Some(0.0),
            max_chip_temperature: 0.0,
            derived_efficiency: Some(0.0),
        }
    }

    /// Normalizes one raw record into sensor values.
    ///
    /// Absent raw fields stay absent (or fall back to the documented
    /// defaults); they are never an error.
    pub fn from_telemetry(telemetry: &MinerTelemetry) -> Self {
        Self {
            hashrate: telemetry.hashrate.map(|rate| round2(rate.value)),
            ideal_hashrate: telemetry.expected_hashrate.map(|rate| round2(rate.value)),
            active_preset_name: telemetry
                .config
                .as_ref()
                .and_then(MiningConfig::active_preset_name),
            temperature: telemetry.average_temperature.map(|t| t.as_celsius()),
            power_limit: telemetry.wattage_limit.map(|p| p.as_watts()),
            miner_consumption: telemetry.wattage.map(|p| p.as_watts()),
            efficiency: telemetry.efficiency,
            max_chip_temperature: peak_chip_temperature(&telemetry.hashboards),
            derived_efficiency: derive_efficiency(telemetry.wattage, telemetry.hashrate),
        }
    }
}

/// Sensor values of a single hashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSensors {
    /// PCB temperature in celsius, as reported
    pub board_temperature: Option<f64>,
    /// Average chip temperature in celsius, as reported
    pub chip_temperature: Option<f64>,
    /// Board hashrate rounded to two decimals, zero when not reported
    pub board_hashrate: f64,
}

impl BoardSensors {
    fn from_board(board: &BoardTelemetry) -> Self {
        Self {
            board_temperature: board.board_temperature.map(|t| t.as_celsius()),
            chip_temperature: board.chip_temperature.map(|t| t.as_celsius()),
            board_hashrate: round2(board.hashrate.map(|rate| rate.value).unwrap_or(0.0)),
        }
    }
}

/// The published view of one miner.
///
/// Every snapshot carries the full field set; an offline device zeroes the
/// values but never changes the shape, so consumers can rely on every key
/// being present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinerSnapshot {
    pub hostname: Option<String>,
    /// Serialized as the canonical display string; `MacAddr` itself has no
    /// serde support.
    #[serde(serialize_with = "serialize_mac")]
    pub mac: Option<MacAddr>,
    pub make: Option<String>,
    pub model: Option<String>,
    /// Address the active session is bound to
    pub ip: Option<IpAddr>,
    /// Whether the device is actually hashing, inferred from consumption
    /// and hashrate rather than taken from the device's own flag
    pub is_mining: Option<bool>,
    pub firmware_version: Option<String>,
    pub miner_sensors: MinerSensors,
    /// Per-board sensors keyed by slot, ordered for stable serialization
    pub board_sensors: BTreeMap<u8, BoardSensors>,
    /// Raw mining configuration, passed through as read from the device
    pub config: MiningConfig,
    pub power_limit_range: PowerLimitRange,
}

impl MinerSnapshot {
    /// The zero-valued snapshot published after a first failed refresh and
    /// as the initial state before any refresh has completed.
    pub fn offline(power_limit_range: PowerLimitRange) -> Self {
        Self {
            hostname: None,
            mac: None,
            make: None,
            model: None,
            ip: None,
            is_mining: Some(false),
            firmware_version: None,
            miner_sensors: MinerSensors::zeroed(),
            board_sensors: BTreeMap::new(),
            config: MiningConfig::default(),
            power_limit_range,
        }
    }

    /// Assembles the published snapshot from one raw record, the session's
    /// address, and the configured power bounds.
    pub fn from_telemetry(
        telemetry: &MinerTelemetry,
        ip: IpAddr,
        power_limit_range: PowerLimitRange,
    ) -> Self {
        Self {
            hostname: telemetry.hostname.clone(),
            mac: telemetry.mac,
            make: telemetry.make.clone(),
            model: telemetry.model.clone(),
            ip: Some(ip),
            is_mining: infer_is_mining(telemetry.wattage, telemetry.hashrate),
            firmware_version: telemetry.firmware_version.clone(),
            miner_sensors: MinerSensors::from_telemetry(telemetry),
            board_sensors: telemetry
                .hashboards
                .iter()
                .map(|board| (board.slot, BoardSensors::from_board(board)))
                .collect(),
            config: telemetry.config.clone().unwrap_or_default(),
            power_limit_range,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_mac<S>(mac: &Option<MacAddr>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match mac {
        Some(mac) => serializer.serialize_some(&mac.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Efficiency in J/TH from measured consumption and (rounded) hashrate.
///
/// Without a consumption reading the value keeps its zero default; with
/// consumption but no hashrate reading there is nothing to divide by.
fn derive_efficiency(wattage: Option<Power>, hashrate: Option<HashRate>) -> Option<f64> {
    let Some(wattage) = wattage else {
        return Some(0.0);
    };
    let rate = hashrate?;
    let rounded = HashRate {
        value: round2(rate.value),
        ..rate
    };
    let joules_per_hash = if rounded.value > 0.0 {
        wattage / rounded
    } else {
        wattage.as_watts() / (rounded.value + ZERO_HASHRATE_EPSILON)
    };
    Some(round2(joules_per_hash))
}

/// Whether the device is hashing, judged from its own measurements.
fn infer_is_mining(wattage: Option<Power>, hashrate: Option<HashRate>) -> Option<bool> {
    let watts = wattage?.as_watts();
    let hashing = hashrate.map(|rate| round2(rate.value) > 0.0).unwrap_or(false);
    Some(watts > MINING_WATTAGE_THRESHOLD && hashing)
}

/// Hottest chip temperature across the boards, skipping boards that did not
/// report one.
fn peak_chip_temperature(boards: &[BoardTelemetry]) -> f64 {
    boards
        .iter()
        .filter_map(|board| board.chip_temperature)
        .map(|temp| temp.as_celsius())
        .fold(0.0, f64::max)
}
