//! The dashboard controller: every user operation and every realtime event
//! lands here and mutates [`DashboardState`].

use {
    crate::{
        app::state::{BannerKind, DashboardState},
        config::{DF, FILTERS, SCAN},
        data::{
            ConnectionManager, ConnectionNotice, ConnectionPhase, EventSink, FilterPayload,
            Incoming, OutboundCommand, RealtimeTransport, ServerEvent, ServerOrigin,
            TransportEvent, protocol::{AutoScanStarted, AutoScanStopped, FilterResponse},
        },
        domain::{CoinList, Comparison, FilterId, ScanProgress, Timeframe},
        error::{ImportError, ScanError},
        ui::UI_TEXT,
        utils::{AppInstant, ms},
    },
    chrono::Local,
    serde_json::Value,
};

pub struct Dashboard {
    state: DashboardState,
    connection: ConnectionManager,
    origin: ServerOrigin,
}

impl Dashboard {
    pub fn new(origin: ServerOrigin, transport: Box<dyn RealtimeTransport>, sink: EventSink) -> Self {
        let connection = ConnectionManager::new(origin.as_str(), transport, sink);
        Self {
            state: DashboardState::default(),
            connection,
            origin,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn origin(&self) -> &ServerOrigin {
        &self.origin
    }

    /// Opens the first realtime session.
    pub fn start(&mut self, now: AppInstant) {
        log::info!("Connecting to {}", self.origin);
        self.connection.connect(now);
    }

    pub fn reconnect_manually(&mut self, now: AppInstant) {
        self.state.show_manual_reconnect = false;
        self.state.outage_reported = false;
        self.connection.connect(now);
    }

    pub fn shutdown(&mut self) {
        self.connection.shutdown();
    }

    // ---------------------------------------------------------------
    // Form
    // ---------------------------------------------------------------

    pub fn toggle_filter(&mut self, id: FilterId) {
        let enabled = self.state.form.toggle(id);
        if DF.log_scan_payloads {
            log::info!("Filter {} -> {}", id, enabled);
        }
    }

    /// One step, or ten when `coarse`. Ignored while the filter is off.
    pub fn adjust_filter(&mut self, id: FilterId, steps: i32, coarse: bool) {
        let factor = if coarse { FILTERS.coarse_factor } else { 1.0 };
        self.state
            .form
            .adjust(id, f64::from(steps) * id.limit().step * factor);
    }

    pub fn set_comparison(&mut self, id: FilterId, op: Comparison) {
        self.state.form.set_comparison(id, op);
    }

    pub fn toggle_timeframe(&mut self, tf: Timeframe) {
        self.state.timeframes.toggle(tf);
    }

    pub fn toggle_closing_scan(&mut self) {
        self.state.closing_scan = !self.state.closing_scan;
    }

    // ---------------------------------------------------------------
    // Coin list
    // ---------------------------------------------------------------

    pub fn load_coin_list(
        &mut self,
        file_name: &str,
        content: Result<String, ImportError>,
        now: AppInstant,
    ) {
        match content {
            Ok(text) => {
                let list = CoinList::from_text(file_name, &text);
                log::info!("Loaded {} symbols from {}", list.len(), file_name);
                self.state.show_banner(
                    BannerKind::Success,
                    UI_TEXT.msg_coins_loaded(list.len()),
                    now,
                );
                self.state.coin_list = Some(list);
            }
            Err(err) => {
                log::error!("Coin list import failed: {}", err);
                self.state
                    .show_banner(BannerKind::Error, UI_TEXT.msg_file_read_error.clone(), now);
                self.state.coin_list = None;
            }
        }
    }

    pub fn reset_coin_list(&mut self) {
        self.state.coin_list = None;
    }

    // ---------------------------------------------------------------
    // One-shot scan
    // ---------------------------------------------------------------

    /// Validates and prepares a `POST /filter`. Returns the body to send, or
    /// `None` when nothing should be sent.
    pub fn submit_scan(&mut self, now: AppInstant) -> Option<FilterPayload> {
        if self.state.scan.in_flight {
            return None;
        }
        if !self.connection.is_connected() {
            self.connection.ensure_connected(now);
        }
        if self.state.timeframes.is_empty() {
            self.state
                .show_banner(BannerKind::Error, UI_TEXT.msg_need_timeframe.clone(), now);
            return None;
        }

        let times = self.state.timeframes.in_click_order();
        self.state.results.begin_multi_scan(&times);
        self.state.scan.in_flight = true;

        let payload = self
            .state
            .build_payload(times, Some(self.state.closing_scan));
        if DF.log_scan_payloads {
            log::info!("Scan payload: {:?}", payload);
        }
        Some(payload)
    }

    pub fn on_scan_response(&mut self, result: Result<FilterResponse, ScanError>, now: AppInstant) {
        match result {
            Ok(_) => {
                if DF.log_scan_payloads {
                    log::info!("/filter finished");
                }
            }
            Err(err) => {
                log::error!("Scan failed: {}", err);
                let text = match &err {
                    ScanError::Rejected(reason) => UI_TEXT.msg_scan_rejected(reason),
                    _ => UI_TEXT.msg_scan_failed.clone(),
                };
                self.state.show_banner(BannerKind::Error, text, now);
                self.state.scan.in_flight = false;
                self.state.results.set_single_progress(ScanProgress::default());
            }
        }
    }

    pub fn clear_single_results(&mut self) {
        self.state.results.clear_single();
    }

    pub fn clear_timeframe_results(&mut self) {
        self.state.results.clear_multi();
    }

    // ---------------------------------------------------------------
    // Auto-scan
    // ---------------------------------------------------------------

    pub fn toggle_auto_scan(&mut self, now: AppInstant) {
        if !self.state.auto_scan.accept_click(now) {
            if DF.log_auto_scan {
                log::info!("Auto-scan toggle ignored (debounce)");
            }
            return;
        }
        if !self.connection.is_connected() {
            if DF.log_auto_scan {
                log::info!("Offline: auto-scan toggle queued until connected");
            }
            self.state.auto_scan.pending_toggle = true;
            if !matches!(self.connection.phase(), ConnectionPhase::Connecting { .. }) {
                self.connection.connect(now);
            }
            return;
        }
        self.run_auto_scan_toggle(now);
    }

    fn run_auto_scan_toggle(&mut self, now: AppInstant) {
        if self.state.auto_scan.active {
            self.stop_auto_scan();
        } else {
            self.start_auto_scan(now);
        }
    }

    fn stop_auto_scan(&mut self) {
        if let Err(err) = self.connection.emit(&OutboundCommand::StopAutoScan) {
            log::warn!("stop_auto_scan not delivered: {}", err);
        }
        self.state.auto_scan.deactivate();
        self.state
            .console
            .append(UI_TEXT.console_auto_stopped.clone(), None);
    }

    fn start_auto_scan(&mut self, now: AppInstant) {
        if self.state.timeframes.is_empty() {
            self.state
                .show_banner(BannerKind::Error, UI_TEXT.msg_need_timeframe.clone(), now);
            return;
        }
        let payload = self.state.build_payload(self.state.timeframes.sorted(), None);
        if DF.log_auto_scan {
            log::info!("Starting auto-scan: {:?}", payload);
        }
        self.state
            .console
            .reset_with(UI_TEXT.console_auto_starting.clone());

        match self.connection.emit(&OutboundCommand::StartAutoScan(payload)) {
            Ok(()) => {
                self.state.auto_scan.active = true;
                self.state.auto_scan.last_heartbeat = Some(now);
            }
            Err(err) => {
                log::error!("start_auto_scan failed: {}", err);
                self.state.auto_scan.deactivate();
                self.state.show_banner(
                    BannerKind::Error,
                    UI_TEXT.msg_auto_start_failed.clone(),
                    now,
                );
            }
        }
    }

    // ---------------------------------------------------------------
    // Realtime events
    // ---------------------------------------------------------------

    pub fn handle_transport_event(&mut self, event: TransportEvent, now: AppInstant) {
        for incoming in self.connection.handle(event, now) {
            self.dispatch(incoming, now);
        }
    }

    fn dispatch(&mut self, incoming: Incoming, now: AppInstant) {
        match incoming {
            Incoming::Notice(notice) => self.on_notice(notice, now),
            Incoming::Message { name, payload } => self.on_message(&name, payload, now),
        }
    }

    fn on_message(&mut self, name: &str, payload: Value, now: AppInstant) {
        match ServerEvent::decode(name, payload) {
            Ok(event) => self.handle_server_event(event, now),
            Err(err) => log::warn!("Dropping realtime event: {}", err),
        }
    }

    fn on_notice(&mut self, notice: ConnectionNotice, now: AppInstant) {
        match notice {
            ConnectionNotice::Connected => {
                self.state.outage_reported = false;
                self.state.show_manual_reconnect = false;
                self.state
                    .show_banner(BannerKind::Info, UI_TEXT.msg_connected.clone(), now);
                if self.state.auto_scan.active {
                    self.state
                        .console
                        .append(UI_TEXT.console_resumed.clone(), None);
                }
                if self.state.auto_scan.pending_toggle {
                    self.state.auto_scan.pending_toggle = false;
                    self.run_auto_scan_toggle(now);
                }
            }
            ConnectionNotice::Reconnected { attempt } => {
                log::info!("Reconnected after {} attempt(s)", attempt);
                self.state
                    .show_banner(BannerKind::Success, UI_TEXT.msg_reconnected.clone(), now);
                if self.state.auto_scan.active {
                    self.state
                        .console
                        .append(UI_TEXT.console_reconnected.clone(), None);
                }
            }
            ConnectionNotice::Disconnected { reason, by_server } => {
                log::warn!("Disconnected: {}", reason);
                if !self.state.outage_reported {
                    self.state.outage_reported = true;
                    let (kind, text) = if by_server {
                        (BannerKind::Error, UI_TEXT.msg_server_disconnected.clone())
                    } else {
                        (BannerKind::Warning, UI_TEXT.msg_disconnected_retrying.clone())
                    };
                    self.state.show_banner(kind, text, now);
                }
                if by_server {
                    self.state.show_manual_reconnect = true;
                }
                if self.state.auto_scan.active {
                    self.state
                        .console
                        .append(UI_TEXT.console_disconnected(&reason), None);
                }
            }
            ConnectionNotice::ConnectError { attempt, message } => {
                log::warn!("Connect error (attempt {}): {}", attempt, message);
                if !self.state.outage_reported {
                    self.state.outage_reported = true;
                    self.state.show_banner(
                        BannerKind::Warning,
                        UI_TEXT.msg_connect_error(attempt, self.connection.max_attempts()),
                        now,
                    );
                }
            }
            ConnectionNotice::ReconnectError { message, .. } => {
                if self.state.auto_scan.active {
                    self.state
                        .console
                        .append(UI_TEXT.console_reconnect_error(&message), None);
                }
            }
            ConnectionNotice::ReconnectFailed => {
                self.state
                    .show_banner(BannerKind::Error, UI_TEXT.msg_reconnect_failed.clone(), now);
                if self.state.auto_scan.active {
                    self.state
                        .console
                        .append(UI_TEXT.console_gave_up.clone(), None);
                    self.state.auto_scan.deactivate();
                }
                self.state.auto_scan.pending_toggle = false;
                self.state.show_manual_reconnect = true;
            }
        }
    }

    pub fn handle_server_event(&mut self, event: ServerEvent, now: AppInstant) {
        match event {
            ServerEvent::MatchFound(result) => self.state.results.add_single_match(&result),
            ServerEvent::ScanProgress(progress) => {
                if self.state.scan.in_flight {
                    self.state.results.set_single_progress(progress);
                }
            }
            ServerEvent::TimeframeMatch(tf, result) => {
                self.state.results.add_timeframe_match(tf, &result);
            }
            ServerEvent::TimeframeProgress(tf, progress) => {
                self.state
                    .results
                    .update_timeframe_progress(tf, progress, now);
            }
            ServerEvent::TimeframeCompleted(tf, done) => {
                self.state
                    .results
                    .update_timeframe_progress(tf, ScanProgress::finished(), now);
                // Auto-scan drives its own lifecycle.
                if !self.state.auto_scan.active {
                    self.state.scan.in_flight = false;
                    self.state.show_banner(
                        BannerKind::Success,
                        UI_TEXT.msg_scan_completed(done.total_matches),
                        now,
                    );
                }
            }
            ServerEvent::AutoScanStarted(started) => self.on_auto_scan_started(started, now),
            ServerEvent::AutoScanResult(result) => {
                if self.state.auto_scan.active {
                    self.state.console.append(result.message, result.timeframe);
                }
            }
            ServerEvent::AutoScanError(err) => {
                self.state
                    .console
                    .append(UI_TEXT.console_error(&err.error), None);
            }
            ServerEvent::AutoScanStopped(stopped) => self.on_auto_scan_stopped(stopped),
            ServerEvent::AutoScanHeartbeat(_) => self.on_heartbeat(now),
        }
    }

    fn on_auto_scan_started(&mut self, started: AutoScanStarted, now: AppInstant) {
        if self.state.auto_scan.fresh_console {
            self.state.console.clear();
            self.state.auto_scan.fresh_console = false;
        }
        self.state.console.append(started.message, None);
        if let Some(params) = &started.params {
            if DF.log_auto_scan {
                log::info!("Restoring running auto-scan session: {:?}", params);
            }
            self.state.restore_from(params);
        }
        self.state.auto_scan.active = true;
        self.state.auto_scan.last_heartbeat = Some(now);
    }

    fn on_auto_scan_stopped(&mut self, stopped: AutoScanStopped) {
        let manual = stopped.message == SCAN.manual_stop_message;
        self.state.console.append(stopped.message, None);
        if manual {
            self.state.auto_scan.deactivate();
            self.state.auto_scan.fresh_console = true;
        } else if DF.log_auto_scan {
            log::info!("auto_scan_stopped without manual stop text; state kept");
        }
    }

    fn on_heartbeat(&mut self, now: AppInstant) {
        if !self.state.auto_scan.active {
            return;
        }
        if let Some(prev) = self.state.auto_scan.last_heartbeat {
            let gap = now.duration_since(prev);
            if gap > ms(SCAN.heartbeat_warn_ms) {
                log::warn!("No auto-scan heartbeat for {:?}", gap);
            }
        }
        self.state.auto_scan.last_heartbeat = Some(now);
        self.state.auto_scan.last_heartbeat_at = Some(Local::now());
    }

    // ---------------------------------------------------------------
    // Timers
    // ---------------------------------------------------------------

    pub fn tick(&mut self, now: AppInstant) {
        for incoming in self.connection.poll(now) {
            self.dispatch(incoming, now);
        }
        self.state.expire_banner(now);
        self.state.results.expire(now);
    }

    /// When the next [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<AppInstant> {
        [
            self.connection.next_deadline(),
            self.state.banner.as_ref().map(|b| b.expires_at),
            self.state.results.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Closing the window would abandon a running auto-scan.
    pub fn should_block_close(&self) -> bool {
        self.state.auto_scan.active
    }
}
