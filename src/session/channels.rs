/// Credential slot for the device's RPC interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcChannel {
    pub password: String,
}

/// Credential slots for the device's web interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebChannel {
    pub username: String,
    pub password: String,
}

/// Credential slots for the device's SSH service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshChannel {
    pub username: String,
    pub password: String,
}

/// The control channels a session actually exposes.
///
/// Devices differ in which services they run. An absent channel means the
/// device does not offer that service, and nothing binds to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    pub rpc: Option<RpcChannel>,
    pub web: Option<WebChannel>,
    pub ssh: Option<SshChannel>,
}
