//! Realtime session lifecycle: one session at a time, bounded reconnects with
//! capped exponential backoff, and a handshake deadline.
//!
//! Transports are configured without their own reconnection; every retry
//! decision is made here so both targets behave the same.

use {
    crate::{
        config::{DF, ReconnectPolicy, SERVER},
        data::{
            protocol::OutboundCommand,
            transport::{EventSink, RealtimeTransport, SessionId, TransportEvent, TransportEventKind},
        },
        error::TransportError,
        utils::{AppInstant, ms},
    },
    serde_json::Value,
    std::time::Duration,
};

/// Disconnect reason reported when a live session fails underneath us.
pub const TRANSPORT_ERROR_REASON: &str = "transport error";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionPhase {
    /// Never connected, or torn down on purpose.
    Idle,
    Connecting {
        since: AppInstant,
        reconnecting: bool,
    },
    Connected,
    /// Backing off before the next attempt.
    Waiting { until: AppInstant },
    /// Retry budget exhausted. Only a manual connect leaves this state.
    Failed,
    /// The server closed the session deliberately; no automatic retry.
    ClosedByServer,
}

/// Lifecycle changes the dashboard reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionNotice {
    Connected,
    Reconnected { attempt: u32 },
    Disconnected { reason: String, by_server: bool },
    ConnectError { attempt: u32, message: String },
    ReconnectError { attempt: u32, message: String },
    ReconnectFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Notice(ConnectionNotice),
    Message { name: String, payload: Value },
}

pub struct ConnectionManager {
    url: String,
    transport: Box<dyn RealtimeTransport>,
    sink: EventSink,
    policy: &'static ReconnectPolicy,
    session: SessionId,
    phase: ConnectionPhase,
    attempts: u32,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>, transport: Box<dyn RealtimeTransport>, sink: EventSink) -> Self {
        Self {
            url: url.into(),
            transport,
            sink,
            policy: &SERVER.reconnect,
            session: 0,
            phase: ConnectionPhase::Idle,
            attempts: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    /// Failed attempts in the current outage.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Starts over: drops any session, resets the retry budget, opens a new one.
    pub fn connect(&mut self, now: AppInstant) {
        self.attempts = 0;
        self.open_session(now, false);
    }

    /// Connects only if nothing is connected or in progress.
    pub fn ensure_connected(&mut self, now: AppInstant) {
        if matches!(
            self.phase,
            ConnectionPhase::Idle | ConnectionPhase::Failed | ConnectionPhase::ClosedByServer
        ) {
            self.connect(now);
        }
    }

    /// Tears the session down for good (app shutdown).
    pub fn shutdown(&mut self) {
        self.transport.close();
        self.session += 1;
        self.phase = ConnectionPhase::Idle;
    }

    pub fn emit(&mut self, command: &OutboundCommand) -> Result<(), TransportError> {
        self.transport.emit(command)
    }

    /// Feeds one transport event through the state machine. Events from a
    /// replaced session yield nothing.
    pub fn handle(&mut self, event: TransportEvent, now: AppInstant) -> Vec<Incoming> {
        if event.session != self.session {
            if DF.log_connection {
                log::debug!(
                    "Dropping event from stale session {} (current {})",
                    event.session,
                    self.session
                );
            }
            return Vec::new();
        }

        match event.kind {
            TransportEventKind::Message { name, payload } => vec![Incoming::Message { name, payload }],
            TransportEventKind::Connected => self.on_connected(),
            TransportEventKind::Disconnected(reason) => self.on_disconnected(reason, now),
            TransportEventKind::ConnectError(message) => self.on_connect_error(message, now),
        }
    }

    /// Timer work: fires due retries and enforces the handshake deadline.
    pub fn poll(&mut self, now: AppInstant) -> Vec<Incoming> {
        match self.phase {
            ConnectionPhase::Waiting { until } if now >= until => {
                if DF.log_connection {
                    log::info!(
                        "Reconnect attempt {}/{} to {}",
                        self.attempts,
                        self.policy.max_attempts,
                        self.url
                    );
                }
                self.open_session(now, true);
                Vec::new()
            }
            ConnectionPhase::Connecting { since, .. }
                if now.duration_since(since) >= ms(self.policy.handshake_timeout_ms) =>
            {
                log::warn!("Handshake with {} timed out", self.url);
                self.transport.close();
                // Invalidate whatever the abandoned session still delivers.
                self.session += 1;
                self.on_connect_error("timeout".to_string(), now)
            }
            _ => Vec::new(),
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has something to do.
    pub fn next_deadline(&self) -> Option<AppInstant> {
        match self.phase {
            ConnectionPhase::Waiting { until } => Some(until),
            ConnectionPhase::Connecting { since, .. } => {
                Some(since + ms(self.policy.handshake_timeout_ms))
            }
            _ => None,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        backoff_delay(self.policy, attempt)
    }

    fn open_session(&mut self, now: AppInstant, reconnecting: bool) {
        self.transport.close();
        self.session += 1;
        self.phase = ConnectionPhase::Connecting {
            since: now,
            reconnecting,
        };
        if DF.log_connection {
            log::info!("Opening realtime session {} to {}", self.session, self.url);
        }
        self.transport.open(&self.url, self.sink.for_session(self.session));
    }

    fn on_connected(&mut self) -> Vec<Incoming> {
        let reconnecting = matches!(
            self.phase,
            ConnectionPhase::Connecting {
                reconnecting: true,
                ..
            }
        );
        let attempt = self.attempts;
        self.phase = ConnectionPhase::Connected;
        self.attempts = 0;

        let mut out = vec![Incoming::Notice(ConnectionNotice::Connected)];
        if reconnecting {
            out.push(Incoming::Notice(ConnectionNotice::Reconnected { attempt }));
        }
        out
    }

    fn on_disconnected(&mut self, reason: String, now: AppInstant) -> Vec<Incoming> {
        if self.phase != ConnectionPhase::Connected {
            return Vec::new();
        }
        let by_server = reason == SERVER.server_disconnect_reason;
        let mut out = vec![Incoming::Notice(ConnectionNotice::Disconnected {
            reason,
            by_server,
        })];
        if by_server {
            self.transport.close();
            self.phase = ConnectionPhase::ClosedByServer;
        } else {
            out.extend(self.schedule_retry(now));
        }
        out
    }

    fn on_connect_error(&mut self, message: String, now: AppInstant) -> Vec<Incoming> {
        let reconnecting = match self.phase {
            ConnectionPhase::Connecting { reconnecting, .. } => reconnecting,
            // Some transports only report a dropped live session as an error.
            ConnectionPhase::Connected => {
                log::warn!("Realtime session to {} failed: {}", self.url, message);
                return self.on_disconnected(TRANSPORT_ERROR_REASON.to_string(), now);
            }
            // A late error for a session we already gave up on.
            _ => return Vec::new(),
        };
        self.transport.close();

        let attempt = self.attempts + 1;
        let mut out = vec![Incoming::Notice(ConnectionNotice::ConnectError {
            attempt,
            message: message.clone(),
        })];
        if reconnecting {
            out.push(Incoming::Notice(ConnectionNotice::ReconnectError {
                attempt: self.attempts,
                message,
            }));
        }
        out.extend(self.schedule_retry(now));
        out
    }

    fn schedule_retry(&mut self, now: AppInstant) -> Vec<Incoming> {
        self.attempts += 1;
        if self.attempts > self.policy.max_attempts {
            log::error!(
                "Giving up on {} after {} reconnect attempts",
                self.url,
                self.policy.max_attempts
            );
            self.phase = ConnectionPhase::Failed;
            return vec![Incoming::Notice(ConnectionNotice::ReconnectFailed)];
        }
        let delay = backoff_delay(self.policy, self.attempts);
        if DF.log_connection {
            log::info!(
                "Retrying in {:?} (attempt {}/{})",
                delay,
                self.attempts,
                self.policy.max_attempts
            );
        }
        self.phase = ConnectionPhase::Waiting { until: now + delay };
        Vec::new()
    }
}

fn backoff_delay(policy: &ReconnectPolicy, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let delay = policy.initial_delay_ms.saturating_mul(1u64 << exp);
    ms(delay.min(policy.max_delay_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transport::testing::{Call, RecordingTransport};
    use std::sync::mpsc;

    fn manager() -> (ConnectionManager, RecordingTransport) {
        let transport = RecordingTransport::default();
        let (tx, _rx) = mpsc::channel();
        let mgr = ConnectionManager::new(
            "http://localhost:5001",
            Box::new(transport.clone()),
            EventSink::new(tx, None),
        );
        (mgr, transport)
    }

    fn event(mgr: &ConnectionManager, kind: TransportEventKind) -> TransportEvent {
        TransportEvent {
            session: mgr.session,
            kind,
        }
    }

    fn notices(incoming: Vec<Incoming>) -> Vec<ConnectionNotice> {
        incoming
            .into_iter()
            .filter_map(|i| match i {
                Incoming::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn backoff_doubles_from_three_seconds_and_caps_at_fifteen() {
        let (mgr, _) = manager();
        let delays: Vec<u64> = (1..=6).map(|n| mgr.backoff_delay(n).as_secs()).collect();
        assert_eq!(delays, [3, 6, 12, 15, 15, 15]);
    }

    #[test]
    fn connect_replaces_the_previous_session() {
        let (mut mgr, transport) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        mgr.connect(now);
        assert_eq!(transport.opens(), 2);
        assert_eq!(transport.calls.borrow()[0], Call::Close);

        let stale = TransportEvent {
            session: 1,
            kind: TransportEventKind::Connected,
        };
        assert!(mgr.handle(stale, now).is_empty());
        assert!(!mgr.is_connected());

        let fresh = event(&mgr, TransportEventKind::Connected);
        assert_eq!(notices(mgr.handle(fresh, now)), vec![ConnectionNotice::Connected]);
        assert!(mgr.is_connected());
    }

    #[test]
    fn gives_up_after_five_failed_retries() {
        let (mut mgr, transport) = manager();
        let mut now = AppInstant::now();
        mgr.connect(now);

        for attempt in 1..=5 {
            let out = notices(mgr.handle(
                event(&mgr, TransportEventKind::ConnectError("refused".into())),
                now,
            ));
            assert!(matches!(out[0], ConnectionNotice::ConnectError { attempt: a, .. } if a == attempt));
            assert_eq!(mgr.attempts(), attempt);

            let until = match mgr.phase() {
                ConnectionPhase::Waiting { until } => until,
                other => panic!("expected backoff, got {:?}", other),
            };
            // Nothing happens before the deadline.
            assert!(mgr.poll(now).is_empty());
            now = until;
            mgr.poll(now);
            assert!(matches!(
                mgr.phase(),
                ConnectionPhase::Connecting {
                    reconnecting: true,
                    ..
                }
            ));
        }
        assert_eq!(transport.opens(), 6);

        let out = notices(mgr.handle(
            event(&mgr, TransportEventKind::ConnectError("refused".into())),
            now,
        ));
        assert_eq!(out.last(), Some(&ConnectionNotice::ReconnectFailed));
        assert_eq!(mgr.phase(), ConnectionPhase::Failed);
        assert_eq!(mgr.next_deadline(), None);

        // Manual retry starts a fresh budget.
        mgr.ensure_connected(now);
        assert_eq!(mgr.attempts(), 0);
        assert_eq!(transport.opens(), 7);
    }

    #[test]
    fn successful_retry_reports_reconnected_and_resets_budget() {
        let (mut mgr, _) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        mgr.handle(event(&mgr, TransportEventKind::Connected), now);

        let out = notices(mgr.handle(
            event(&mgr, TransportEventKind::Disconnected("transport close".into())),
            now,
        ));
        assert_eq!(
            out,
            vec![ConnectionNotice::Disconnected {
                reason: "transport close".into(),
                by_server: false
            }]
        );
        let later = now + mgr.backoff_delay(1);
        mgr.poll(later);
        let out = notices(mgr.handle(event(&mgr, TransportEventKind::Connected), later));
        assert_eq!(
            out,
            vec![
                ConnectionNotice::Connected,
                ConnectionNotice::Reconnected { attempt: 1 }
            ]
        );
        assert_eq!(mgr.attempts(), 0);
    }

    #[test]
    fn server_initiated_disconnect_does_not_retry() {
        let (mut mgr, transport) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        mgr.handle(event(&mgr, TransportEventKind::Connected), now);
        let out = notices(mgr.handle(
            event(&mgr, TransportEventKind::Disconnected("io server disconnect".into())),
            now,
        ));
        assert!(matches!(out[0], ConnectionNotice::Disconnected { by_server: true, .. }));
        assert_eq!(mgr.phase(), ConnectionPhase::ClosedByServer);
        assert!(mgr.poll(now + ms(60_000)).is_empty());
        assert_eq!(transport.opens(), 1);
    }

    #[test]
    fn error_on_a_live_session_is_a_disconnect_with_backoff() {
        let (mut mgr, transport) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        mgr.handle(event(&mgr, TransportEventKind::Connected), now);

        let out = notices(mgr.handle(
            event(&mgr, TransportEventKind::ConnectError("EngineIO Error".into())),
            now,
        ));
        assert_eq!(
            out,
            vec![ConnectionNotice::Disconnected {
                reason: TRANSPORT_ERROR_REASON.into(),
                by_server: false
            }]
        );
        assert!(!mgr.is_connected());
        assert_eq!(mgr.next_deadline(), Some(now + mgr.backoff_delay(1)));

        // A second error from the same dead session changes nothing.
        assert!(mgr
            .handle(
                event(&mgr, TransportEventKind::ConnectError("EngineIO Error".into())),
                now,
            )
            .is_empty());
        assert_eq!(mgr.attempts(), 1);

        mgr.poll(now + ms(60_000));
        assert_eq!(transport.opens(), 2);
    }

    #[test]
    fn handshake_timeout_counts_as_a_failed_attempt() {
        let (mut mgr, _) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        assert!(mgr.poll(now + ms(29_000)).is_empty());

        let out = notices(mgr.poll(now + ms(30_000)));
        assert!(matches!(&out[0], ConnectionNotice::ConnectError { message, .. } if message == "timeout"));
        assert!(matches!(mgr.phase(), ConnectionPhase::Waiting { .. }));
    }

    #[test]
    fn messages_pass_through_untouched() {
        let (mut mgr, _) = manager();
        let now = AppInstant::now();
        mgr.connect(now);
        let out = mgr.handle(
            event(
                &mgr,
                TransportEventKind::Message {
                    name: "match_found".into(),
                    payload: Value::Null,
                },
            ),
            now,
        );
        assert!(matches!(&out[0], Incoming::Message { name, .. } if name == "match_found"));
    }
}
