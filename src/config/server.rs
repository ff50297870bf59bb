//! Scan server location and realtime channel policy.

/// Reconnection policy for the realtime session.
pub struct ReconnectPolicy {
    /// Attempts after the first failure before giving up.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// A session that has not completed its handshake by now counts as failed.
    pub handshake_timeout_ms: u64,
}

pub struct ServerConfig {
    pub port: u16,
    /// Hosts treated as local development (cross-origin, plain http).
    pub local_hosts: &'static [&'static str],
    pub local_origin: &'static str,
    pub filter_path: &'static str,
    pub reconnect: ReconnectPolicy,
    /// Disconnect reason reported when the server closed the session on purpose.
    pub server_disconnect_reason: &'static str,
}

pub const SERVER: ServerConfig = ServerConfig {
    port: 5001,
    local_hosts: &["localhost", "127.0.0.1"],
    local_origin: "http://localhost:5001",
    filter_path: "/filter",
    reconnect: ReconnectPolicy {
        max_attempts: 5,
        initial_delay_ms: 3_000,
        max_delay_ms: 15_000,
        handshake_timeout_ms: 30_000,
    },
    server_disconnect_reason: "io server disconnect",
};
