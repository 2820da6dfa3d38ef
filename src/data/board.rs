use measurements::Temperature;

use super::hashrate::HashRate;

/// Raw readings for a single hashboard, as reported by the device.
///
/// Any field may be absent; a board that is unplugged or still warming up
/// commonly reports only its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTelemetry {
    /// The board slot in the miner, indexed from 0
    pub slot: u8,
    /// The current hashrate of the board
    pub hashrate: Option<HashRate>,
    /// The board temperature, also sometimes called PCB temperature
    pub board_temperature: Option<Temperature>,
    /// The average temperature of the chips on this board
    pub chip_temperature: Option<Temperature>,
}

impl BoardTelemetry {
    /// A board that reported nothing but its slot.
    pub fn empty(slot: u8) -> Self {
        Self {
            slot,
            hashrate: None,
            board_temperature: None,
            chip_temperature: None,
        }
    }
}
