//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Every raw realtime event as it leaves the transport.
    pub log_transport_events: bool,

    /// Session open/close, backoff scheduling and handshake timeouts.
    pub log_connection: bool,

    /// Outbound filter payloads (HTTP and realtime).
    pub log_scan_payloads: bool,

    /// Auto-scan lifecycle reconciliation.
    pub log_auto_scan: bool,

    pub log_results: bool,
}

pub const DF: LogFlags = LogFlags {
    log_connection: true,
    log_auto_scan: true,

    log_transport_events: false,
    log_scan_payloads: false,
    log_results: false,
};
