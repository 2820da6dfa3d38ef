use std::net::IpAddr;

use thiserror::Error;

/// Faults surfaced by a transport while talking to a device.
///
/// These are recoverable: a failed fetch feeds the coordinator's failure
/// handling the same way an absent device does.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Telemetry retrieval started but did not complete.
    #[error("telemetry fetch failed: {0}")]
    Fetch(String),
    /// A control command was sent but did not complete.
    #[error("device command failed: {0}")]
    Command(String),
}

/// Errors returned by coordinator control calls.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// No session has ever been acquired, so there is nothing to command.
    #[error("no active session for {0}")]
    NoSession(IpAddr),
    /// The device does not implement the capability the call relies on.
    #[error("device does not support {feature}")]
    Unsupported { feature: &'static str },
    /// The device acknowledged the command but refused the new limit.
    #[error("device rejected power limit of {watts} W")]
    PowerLimitRejected { watts: u32 },
    /// The command could not be delivered at all.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
