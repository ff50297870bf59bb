mod connection;
mod origin;
pub mod protocol;
mod scan_api;
mod transport;

#[cfg(not(target_arch = "wasm32"))]
mod socket_native;
#[cfg(target_arch = "wasm32")]
mod socket_web;

pub use {
    connection::{ConnectionManager, ConnectionNotice, ConnectionPhase, Incoming},
    origin::{PageLocation, ServerOrigin},
    protocol::{FilterPayload, OutboundCommand, ServerEvent},
    scan_api::{check_response, submit_filter},
    transport::{EventSink, RealtimeTransport, SessionId, TransportEvent, TransportEventKind},
};

#[cfg(test)]
pub(crate) use transport::testing;

#[cfg(not(target_arch = "wasm32"))]
pub use socket_native::SocketIoTransport;

#[cfg(target_arch = "wasm32")]
pub use socket_web::WebSocketIoTransport;

/// The transport matching the build target.
pub fn default_transport() -> Box<dyn RealtimeTransport> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(SocketIoTransport::new())
    }
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(WebSocketIoTransport::new())
    }
}
