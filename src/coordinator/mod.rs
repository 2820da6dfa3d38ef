use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::data::mining::MiningMode;
use crate::data::snapshot::MinerSnapshot;
use crate::data::telemetry::TelemetryField;
use crate::error::{CoordinatorError, TransportError};
use crate::session::manager::SessionManager;
use crate::session::traits::{DeviceSession, MinerTransport};
use crate::settings::MinerSettings;

mod debounce;
mod failure;

use debounce::Debouncer;
use failure::{FailureState, FailureTracker};

/// How often the device is polled.
const UPDATE_INTERVAL: Duration = Duration::from_secs(10);

/// Cooldown for coalescing manual refresh requests.
const REFRESH_COOLDOWN: Duration = Duration::from_secs(5);

/// How long shutdown waits for the update task before abandoning it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Everything one snapshot needs. Sessions are free to batch these into
/// fewer device commands.
const TELEMETRY_FIELDS: &[TelemetryField] = &[
    TelemetryField::Hostname,
    TelemetryField::Mac,
    TelemetryField::Make,
    TelemetryField::Model,
    TelemetryField::FirmwareVersion,
    TelemetryField::IsMining,
    TelemetryField::Hashrate,
    TelemetryField::ExpectedHashrate,
    TelemetryField::Hashboards,
    TelemetryField::AverageTemperature,
    TelemetryField::Wattage,
    TelemetryField::WattageLimit,
    TelemetryField::Efficiency,
    TelemetryField::Config,
];

/// What consumers read: the latest snapshot and whether it is current.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorData {
    pub snapshot: MinerSnapshot,
    /// False once refreshes have failed twice in a row. The snapshot then
    /// holds the last known values.
    pub available: bool,
}

/// Polls one miner on a fixed interval and publishes normalized snapshots.
///
/// A single spawned update task owns the schedule and the failure
/// bookkeeping, so fetches never overlap. One failed refresh publishes a
/// zeroed but fully shaped snapshot; consecutive failures mark the data
/// unavailable until a refresh succeeds again. The coordinator runs until
/// [`shutdown`](Self::shutdown) is called.
pub struct MinerCoordinator {
    name: String,
    settings: MinerSettings,
    sessions: SessionManager,
    state_tx: watch::Sender<CoordinatorData>,
    debouncer: Debouncer,
    cancel: CancellationToken,
    update_task: StdMutex<Option<JoinHandle<()>>>,
}

impl MinerCoordinator {
    /// Spawns the update loop. The first refresh runs immediately.
    pub fn start(settings: MinerSettings, transport: Arc<dyn MinerTransport>) -> Arc<Self> {
        let initial = CoordinatorData {
            snapshot: MinerSnapshot::offline(settings.power_limit_range()),
            available: true,
        };
        let (state_tx, _) = watch::channel(initial);
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();

        let coordinator = Arc::new(Self {
            name: settings.display_name(),
            sessions: SessionManager::new(settings.clone(), transport),
            settings,
            state_tx,
            debouncer: Debouncer::new(REFRESH_COOLDOWN, move || {
                let _ = refresh_tx.send(());
            }),
            cancel: CancellationToken::new(),
            update_task: StdMutex::new(None),
        });

        let task = tokio::spawn(run_update_loop(Arc::clone(&coordinator), refresh_rx));
        *coordinator
            .update_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
        coordinator
    }

    /// The currently published data.
    pub fn data(&self) -> CoordinatorData {
        self.state_tx.borrow().clone()
    }

    /// A receiver that observes every published change.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorData> {
        self.state_tx.subscribe()
    }

    /// Asks for a refresh outside the regular schedule.
    ///
    /// Requests are debounced: the first in an idle period runs right away,
    /// and a burst inside the cooldown window runs exactly once more after
    /// the cooldown has passed. Refreshes never overlap; a request landing
    /// while a fetch is in flight runs after it.
    pub fn request_refresh(&self) {
        self.debouncer.request();
    }

    /// Whether a device session has ever been acquired.
    pub fn has_session(&self) -> bool {
        self.sessions.cached().is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Switches the miner's operating mode.
    ///
    /// Talks to the cached session directly, outside the refresh schedule.
    /// A refresh that is replacing the session at the same time may leave
    /// this call on the superseded handle.
    pub async fn set_mining_mode(&self, mode: MiningMode) -> Result<(), CoordinatorError> {
        let session = self.command_session()?;
        if !session.supports_power_modes() {
            return Err(CoordinatorError::Unsupported {
                feature: "mining modes",
            });
        }
        info!(miner = %self.name, %mode, "setting mining mode");
        session.set_mining_mode(mode).await?;
        Ok(())
    }

    /// Sets the wattage target on a device that can tune toward one.
    pub async fn set_power_limit(&self, watts: u32) -> Result<(), CoordinatorError> {
        let session = self.command_session()?;
        if !session.supports_autotuning() {
            return Err(CoordinatorError::Unsupported {
                feature: "autotuning",
            });
        }
        info!(miner = %self.name, watts, "setting power limit");
        if !session.set_power_limit(watts).await? {
            return Err(CoordinatorError::PowerLimitRejected { watts });
        }
        Ok(())
    }

    /// Stops the update loop and waits briefly for it to wind down.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self
            .update_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut task) = task {
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    error!(miner = %self.name, %error, "update task ended abnormally")
                }
                Err(_) => {
                    warn!(miner = %self.name, "update task did not stop in time, aborting it");
                    task.abort();
                }
            }
        }
    }

    fn command_session(&self) -> Result<Arc<dyn DeviceSession>, CoordinatorError> {
        self.sessions
            .cached()
            .ok_or(CoordinatorError::NoSession(self.settings.address))
    }

    async fn refresh_once(&self, failures: &mut FailureTracker) {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                failures.record_success();
                self.state_tx.send_replace(CoordinatorData {
                    snapshot,
                    available: true,
                });
            }
            Err(error) => match failures.record_failure() {
                FailureState::Degraded => {
                    warn!(
                        miner = %self.name,
                        %error,
                        "refresh failed, publishing zeroed data (first failure)",
                    );
                    self.state_tx.send_replace(CoordinatorData {
                        snapshot: MinerSnapshot::offline(self.settings.power_limit_range()),
                        available: true,
                    });
                }
                _ => {
                    error!(
                        miner = %self.name,
                        %error,
                        consecutive = failures.consecutive_failures(),
                        "refresh failed again, marking data unavailable",
                    );
                    self.state_tx.send_modify(|data| data.available = false);
                }
            },
        }
    }

    async fn fetch_snapshot(&self) -> Result<MinerSnapshot, RefreshError> {
        let Some(session) = self.sessions.acquire().await else {
            return Err(RefreshError::DeviceAbsent);
        };
        debug!(miner = %self.name, ip = %session.ip(), "acquired device session");
        let telemetry = session.fetch_telemetry(TELEMETRY_FIELDS).await?;
        debug!(miner = %self.name, ?telemetry, "fetched telemetry");
        Ok(MinerSnapshot::from_telemetry(
            &telemetry,
            session.ip(),
            self.settings.power_limit_range(),
        ))
    }
}

/// Why one refresh cycle produced nothing publishable.
#[derive(Debug, thiserror::Error)]
enum RefreshError {
    /// The transport found no usable device at the address.
    #[error("no reachable device")]
    DeviceAbsent,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

async fn run_update_loop(
    coordinator: Arc<MinerCoordinator>,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
) {
    let mut failures = FailureTracker::new();
    let mut ticker = tokio::time::interval(UPDATE_INTERVAL);
    // A missed tick is not worth catching up on; the next one polls anyway.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = coordinator.cancel.cancelled() => break,
            _ = ticker.tick() => {}
            request = refresh_rx.recv() => {
                if request.is_none() {
                    break;
                }
            }
        }
        coordinator.refresh_once(&mut failures).await;
    }
    debug!(miner = %coordinator.name, "update loop stopped");
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn the_requested_set_covers_every_telemetry_field() {
        for field in TelemetryField::iter() {
            assert!(
                TELEMETRY_FIELDS.contains(&field),
                "{field:?} is not requested",
            );
        }
    }
}
