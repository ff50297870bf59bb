//! Socket.IO transport for desktop builds, backed by `rust_socketio`.

use {
    crate::{
        config::SERVER,
        data::{
            protocol::{OutboundCommand, subscribed_event_names},
            transport::{EventSink, RealtimeTransport, TransportEventKind},
        },
        error::TransportError,
    },
    rust_socketio::{ClientBuilder, Event, Payload, RawClient, TransportType, client::Client},
    serde_json::Value,
    std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        thread,
    },
};

/// One opened session. The handshake runs on its own thread, so the client
/// shows up here some time after `open` returned, or never.
#[derive(Default)]
struct SessionSlot {
    client: Mutex<Option<Client>>,
    closed: AtomicBool,
}

impl SessionSlot {
    fn take_client(&self) -> Option<Client> {
        self.client.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[derive(Default)]
pub struct SocketIoTransport {
    current: Option<Arc<SessionSlot>>,
}

impl SocketIoTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn first_argument(payload: Payload) -> Value {
    match payload {
        Payload::Text(mut values) if !values.is_empty() => values.swap_remove(0),
        _ => Value::Null,
    }
}

fn payload_text(payload: Payload, fallback: &str) -> String {
    match first_argument(payload) {
        Value::String(s) => s,
        Value::Null => fallback.to_string(),
        other => other.to_string(),
    }
}

fn server_closed() -> TransportEventKind {
    TransportEventKind::Disconnected(SERVER.server_disconnect_reason.to_string())
}

fn build_client(url: &str, sink: &EventSink) -> ClientBuilder {
    let mut builder = ClientBuilder::new(url)
        .transport_type(TransportType::Polling)
        // Retries are driven by the connection manager.
        .reconnect(false);

    let s = sink.clone();
    builder = builder.on(Event::Connect, move |_payload: Payload, _client: RawClient| {
        s.send(TransportEventKind::Connected);
    });

    // The client only raises `Close` for a Disconnect packet from the server;
    // our own `close` retires the session before its echo is handled.
    let s = sink.clone();
    builder = builder.on(Event::Close, move |_payload: Payload, _client: RawClient| {
        s.send(server_closed());
    });

    let s = sink.clone();
    builder = builder.on(Event::Error, move |payload: Payload, _client: RawClient| {
        let message = payload_text(payload, "unknown error");
        log::warn!("Socket.IO error: {}", message);
        s.send(TransportEventKind::ConnectError(message));
    });

    for name in subscribed_event_names() {
        let s = sink.clone();
        let event_name = name.clone();
        builder = builder.on(name.as_str(), move |payload: Payload, _client: RawClient| {
            s.send(TransportEventKind::Message {
                name: event_name.clone(),
                payload: first_argument(payload),
            });
        });
    }
    builder
}

impl RealtimeTransport for SocketIoTransport {
    fn open(&mut self, url: &str, sink: EventSink) {
        self.close();
        let slot = Arc::new(SessionSlot::default());
        self.current = Some(slot.clone());

        let builder = build_client(url, &sink);
        let url = url.to_string();
        thread::spawn(move || match builder.connect() {
            Ok(client) => {
                if slot.closed.load(Ordering::SeqCst) {
                    // Superseded while the handshake was in flight.
                    let _ = client.disconnect();
                    return;
                }
                *slot.client.lock().unwrap_or_else(|e| e.into_inner()) = Some(client);
            }
            Err(e) => {
                log::error!("Socket.IO connect to {} failed: {}", url, e);
                sink.send(TransportEventKind::ConnectError(e.to_string()));
            }
        });
    }

    fn close(&mut self) {
        if let Some(slot) = self.current.take() {
            slot.closed.store(true, Ordering::SeqCst);
            if let Some(client) = slot.take_client() {
                if let Err(e) = client.disconnect() {
                    log::warn!("Socket.IO disconnect failed: {}", e);
                }
            }
        }
    }

    fn emit(&mut self, command: &OutboundCommand) -> Result<(), TransportError> {
        let slot = self.current.as_ref().ok_or(TransportError::NotConnected)?;
        let guard = slot.client.lock().unwrap_or_else(|e| e.into_inner());
        let client = guard.as_ref().ok_or(TransportError::NotConnected)?;

        let payload = match command.payload() {
            Some(value) => Payload::Text(vec![value]),
            None => Payload::Text(Vec::new()),
        };
        client
            .emit(command.name(), payload)
            .map_err(|e| TransportError::Emit(e.to_string()))
    }
}

impl Drop for SocketIoTransport {
    fn drop(&mut self) {
        self.close();
    }
}
