//! Socket.IO transport for the browser build. Drives the page's own
//! `socket.io-client` (global `io`) through `wasm-bindgen`.

use {
    crate::{
        config::SERVER,
        data::{
            protocol::{OutboundCommand, subscribed_event_names},
            transport::{EventSink, RealtimeTransport, TransportEventKind},
        },
        error::TransportError,
    },
    serde_json::{Value, json},
    wasm_bindgen::{JsValue, prelude::*},
};

#[wasm_bindgen]
extern "C" {
    type JsSocket;

    #[wasm_bindgen(js_name = io)]
    fn io(url: &str, opts: &JsValue) -> JsSocket;

    #[wasm_bindgen(method)]
    fn on(this: &JsSocket, event: &str, callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method)]
    fn off(this: &JsSocket);

    #[wasm_bindgen(method, js_name = emit)]
    fn emit_with(this: &JsSocket, event: &str, payload: &JsValue);

    #[wasm_bindgen(method, js_name = emit)]
    fn emit_bare(this: &JsSocket, event: &str);

    #[wasm_bindgen(method)]
    fn disconnect(this: &JsSocket);

    #[wasm_bindgen(method, getter)]
    fn connected(this: &JsSocket) -> bool;
}

struct Session {
    socket: JsSocket,
    // Kept alive for as long as the socket may call them.
    _handlers: Vec<Closure<dyn FnMut(JsValue)>>,
}

#[derive(Default)]
pub struct WebSocketIoTransport {
    session: Option<Session>,
}

impl WebSocketIoTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_json(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

fn to_js(value: &Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL)
}

fn error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

fn socket_options() -> JsValue {
    to_js(&json!({
        "transports": ["polling"],
        "upgrade": false,
        "rememberUpgrade": false,
        // Retries are driven by the connection manager.
        "reconnection": false,
        "forceNew": true,
        "autoConnect": true,
        "timeout": SERVER.reconnect.handshake_timeout_ms,
    }))
}

fn listen(
    socket: &JsSocket,
    handlers: &mut Vec<Closure<dyn FnMut(JsValue)>>,
    event: &str,
    handler: impl FnMut(JsValue) + 'static,
) {
    let closure = Closure::new(handler);
    socket.on(event, &closure);
    handlers.push(closure);
}

impl RealtimeTransport for WebSocketIoTransport {
    fn open(&mut self, url: &str, sink: EventSink) {
        self.close();
        let socket = io(url, &socket_options());
        let mut handlers = Vec::new();

        let s = sink.clone();
        listen(&socket, &mut handlers, "connect", move |_| {
            s.send(TransportEventKind::Connected);
        });

        let s = sink.clone();
        listen(&socket, &mut handlers, "disconnect", move |reason| {
            s.send(TransportEventKind::Disconnected(
                reason.as_string().unwrap_or_default(),
            ));
        });

        let s = sink.clone();
        listen(&socket, &mut handlers, "connect_error", move |err| {
            s.send(TransportEventKind::ConnectError(error_message(&err)));
        });

        for name in subscribed_event_names() {
            let s = sink.clone();
            let event_name = name.clone();
            listen(&socket, &mut handlers, &name, move |payload| {
                s.send(TransportEventKind::Message {
                    name: event_name.clone(),
                    payload: to_json(&payload),
                });
            });
        }

        self.session = Some(Session {
            socket,
            _handlers: handlers,
        });
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            // Detach first: dropping a closure JS can still call would trap.
            session.socket.off();
            session.socket.disconnect();
        }
    }

    fn emit(&mut self, command: &OutboundCommand) -> Result<(), TransportError> {
        let session = self.session.as_ref().ok_or(TransportError::NotConnected)?;
        if !session.socket.connected() {
            return Err(TransportError::NotConnected);
        }
        match command.payload() {
            Some(payload) => session.socket.emit_with(command.name(), &to_js(&payload)),
            None => session.socket.emit_bare(command.name()),
        }
        Ok(())
    }
}
