pub mod board;
pub mod hashrate;
pub mod mining;
pub mod snapshot;
pub mod telemetry;
