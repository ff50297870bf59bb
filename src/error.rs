//! Error types for the dashboard.
//!
//! Every failure here ends up as a banner in the UI, so the `Display`
//! text is what the user reads in the log and (for some) on screen.

use thiserror::Error;

/// A `POST /filter` round trip that did not end in `{"status":"success"}`.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The server answered but rejected the scan. Carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScanError::Body(err.to_string())
        } else {
            ScanError::Request(err.to_string())
        }
    }
}

/// Reading an uploaded coin list failed before any parsing happened.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("could not read {name}: {reason}")]
    Unreadable { name: String, reason: String },

    #[error("{0} is not valid UTF-8 text")]
    NotText(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("no open realtime session")]
    NotConnected,

    #[error("emit failed: {0}")]
    Emit(String),
}

/// A realtime event whose name or payload we do not understand.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("bad payload for '{event}': {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}
