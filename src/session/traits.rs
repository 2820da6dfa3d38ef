use std::net::IpAddr;

use async_trait::async_trait;

use crate::data::mining::MiningMode;
use crate::data::telemetry::{MinerTelemetry, TelemetryField};
use crate::error::TransportError;

use super::channels::ChannelSet;

/// A live session with one reachable device.
///
/// Implementations wrap whatever mix of RPC, web and SSH the device speaks.
/// Sessions are replaced wholesale on re-acquisition, never repaired in
/// place, and there is no explicit teardown.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// The address this session is bound to.
    fn ip(&self) -> IpAddr;

    /// The control channels this device exposes, for credential binding.
    fn channels_mut(&mut self) -> &mut ChannelSet;

    /// Fetches the requested telemetry fields.
    ///
    /// A session may satisfy several fields from a single device command;
    /// the set only tells it what the caller is going to read. Fields the
    /// device cannot provide come back as `None` in the record.
    async fn fetch_telemetry(
        &self,
        fields: &[TelemetryField],
    ) -> Result<MinerTelemetry, TransportError>;

    /// Whether the device exposes selectable mining modes.
    fn supports_power_modes(&self) -> bool;

    /// Whether the device can tune itself toward a wattage target.
    fn supports_autotuning(&self) -> bool;

    /// Switches the device's mining mode.
    async fn set_mining_mode(&self, mode: MiningMode) -> Result<(), TransportError>;

    /// Sets the wattage target. `Ok(false)` means the device heard the
    /// command and refused it.
    async fn set_power_limit(&self, watts: u32) -> Result<bool, TransportError>;
}

/// Opens sessions to devices by address.
#[async_trait]
pub trait MinerTransport: Send + Sync {
    /// Contacts the address and opens a session when a known device answers.
    ///
    /// `None` means nothing usable answered right now; that is a routine
    /// outcome for a device that is rebooting or unplugged, not a fault.
    async fn open_session(&self, address: IpAddr) -> Option<Box<dyn DeviceSession>>;
}
