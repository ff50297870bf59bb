//! Timers and limits of the scan dashboard.

pub struct ScanConfig {
    /// Clicks on the auto-scan button closer together than this are dropped.
    pub toggle_debounce_ms: u64,
    /// How long a per-timeframe progress bar lingers after reaching 100%.
    pub progress_linger_ms: u64,
    /// Lifetime of a status banner.
    pub banner_ttl_ms: u64,
    /// Heartbeat gap that triggers a warning in the log.
    pub heartbeat_warn_ms: u64,
    /// Oldest console lines are dropped beyond this.
    pub console_max_lines: usize,
    /// Exact text the server sends when a user-requested stop went through.
    pub manual_stop_message: &'static str,
}

pub const SCAN: ScanConfig = ScanConfig {
    toggle_debounce_ms: 1_000,
    progress_linger_ms: 2_000,
    banner_ttl_ms: 5_000,
    heartbeat_warn_ms: 90_000,
    console_max_lines: 1_000,
    manual_stop_message: "Otomatik tarama durduruldu",
};
