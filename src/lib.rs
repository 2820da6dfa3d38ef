//! Polling coordinator for network-attached ASIC miners.
//!
//! One [`MinerCoordinator`] watches one device: a fixed-interval update
//! task fetches raw telemetry through a pluggable transport, normalizes it
//! into an always-shaped snapshot, and publishes the result through a
//! watch channel. A single failed refresh publishes zeroed data; two
//! failures in a row mark the data unavailable until the device answers
//! again. Control calls (mining mode, power limit) go straight to the
//! most recently acquired session.

pub mod coordinator;
pub mod data;
pub mod error;
pub mod session;
pub mod settings;

pub use coordinator::{CoordinatorData, MinerCoordinator};
pub use data::mining::{MiningConfig, MiningMode};
pub use data::snapshot::{MinerSnapshot, PowerLimitRange};
pub use data::telemetry::{MinerTelemetry, TelemetryField};
pub use error::{CoordinatorError, TransportError};
pub use session::channels::ChannelSet;
pub use session::traits::{DeviceSession, MinerTransport};
pub use settings::MinerSettings;
