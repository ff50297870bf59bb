//! Seam between the dashboard and whatever carries the realtime channel.
//!
//! Transports run callbacks off the UI thread (native) or from JS (wasm). They
//! never touch dashboard state; they push [`TransportEvent`]s into a channel
//! that the UI drains once per frame.

use {
    crate::{config::DF, data::protocol::OutboundCommand, error::TransportError},
    eframe::egui::Context,
    serde_json::Value,
    std::sync::mpsc::Sender,
};

/// Generation number of a realtime session. Bumped on every (re)open so late
/// callbacks from a replaced session can be told apart.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEventKind {
    Connected,
    Disconnected(String),
    /// The handshake failed, or a live session broke. The session is dead.
    ConnectError(String),
    /// Application event by name, with its first argument (or `null`).
    Message { name: String, payload: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub session: SessionId,
    pub kind: TransportEventKind,
}

/// Where a session delivers its events.
#[derive(Clone)]
pub struct EventSink {
    session: SessionId,
    tx: Sender<TransportEvent>,
    repaint: Option<Context>,
}

impl EventSink {
    pub fn new(tx: Sender<TransportEvent>, repaint: Option<Context>) -> Self {
        Self {
            session: 0,
            tx,
            repaint,
        }
    }

    pub fn for_session(&self, session: SessionId) -> Self {
        Self {
            session,
            ..self.clone()
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn send(&self, kind: TransportEventKind) {
        if DF.log_transport_events {
            log::info!("[session {}] {:?}", self.session, kind);
        }
        // Receiver gone means the app is shutting down.
        let _ = self.tx.send(TransportEvent {
            session: self.session,
            kind,
        });
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

/// A realtime client that can hold one session at a time.
pub trait RealtimeTransport {
    /// Opens a new session to `url`, replacing any previous one. Must return
    /// promptly; the outcome arrives later through `sink`.
    fn open(&mut self, url: &str, sink: EventSink);

    /// Drops the current session, if any. No further events are expected from it.
    fn close(&mut self);

    fn emit(&mut self, command: &OutboundCommand) -> Result<(), TransportError>;
}
