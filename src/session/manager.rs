use std::sync::{Arc, PoisonError, RwLock};

use crate::settings::MinerSettings;

use super::channels::ChannelSet;
use super::traits::{DeviceSession, MinerTransport};

/// Acquires, credential-binds and caches device sessions.
///
/// Every acquisition opens a fresh session and binds credentials once,
/// before anything else can touch it. The cache only moves forward: a
/// failed acquisition leaves the last good session in place, so control
/// calls keep working on the handle that last answered.
pub struct SessionManager {
    settings: MinerSettings,
    transport: Arc<dyn MinerTransport>,
    current: RwLock<Option<Arc<dyn DeviceSession>>>,
}

impl SessionManager {
    pub fn new(settings: MinerSettings, transport: Arc<dyn MinerTransport>) -> Self {
        Self {
            settings,
            transport,
            current: RwLock::new(None),
        }
    }

    /// Opens and binds a session to the configured address.
    ///
    /// `None` means the device is absent right now; the cached session is
    /// untouched in that case.
    pub async fn acquire(&self) -> Option<Arc<dyn DeviceSession>> {
        let mut session = self.transport.open_session(self.settings.address).await?;
        bind_credentials(session.channels_mut(), &self.settings);
        let session: Arc<dyn DeviceSession> = Arc::from(session);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&session));
        Some(session)
    }

    /// The most recently acquired session, if any.
    ///
    /// A refresh that is replacing the session concurrently may leave the
    /// returned handle one generation behind.
    pub fn cached(&self) -> Option<Arc<dyn DeviceSession>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Writes configured credentials into every channel the device exposes.
/// Unset credentials bind as empty strings; absent channels are skipped.
fn bind_credentials(channels: &mut ChannelSet, settings: &MinerSettings) {
    if let Some(rpc) = channels.rpc.as_mut() {
        rpc.password = settings.rpc_password.clone().unwrap_or_default();
    }
    if let Some(web) = channels.web.as_mut() {
        web.username = settings.web_username.clone().unwrap_or_default();
        web.password = settings.web_password.clone().unwrap_or_default();
    }
    if let Some(ssh) = channels.ssh.as_mut() {
        ssh.username = settings.ssh_username.clone().unwrap_or_default();
        ssh.password = settings.ssh_password.clone().unwrap_or_default();
    }
}
