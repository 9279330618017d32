use std::fmt;
use std::io;
use std::net::AddrParseError;

/// Crate-wide error type.
///
/// Mirrors the error kinds enumerated by the control plane, the matcher,
/// and the request-building layer: lifecycle misuse, registration
/// collisions, and per-request failures that the connection layer catches
/// and turns into `500` responses rather than letting them escape.
#[derive(Debug)]
pub enum WaypostError {
    /// Malformed listen address passed to `Server::new` / `start_admin_server`.
    InvalidAddress(String),
    /// `start` called while not `configured`.
    AlreadyStarted,
    /// `stop_and_wait` called while not `running`.
    NotStarted,
    /// Duplicate path template registered against the matcher.
    TemplateCollision(String),
    /// An integer path variable failed to parse.
    InvalidParameter(String),
    /// The request URL could not be decomposed into path + query.
    UrlParseError(String),
    /// An HTTP verb outside GET/PUT/POST/DELETE was seen on the wire.
    MethodUnknown(String),
    /// A read/write failure on the underlying stream.
    StreamError(io::Error),
    /// I/O failure not tied to a single connection (bind, accept, ...).
    Io(io::Error),
}

impl fmt::Display for WaypostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress(addr) => write!(f, "invalid address: {}", addr),
            Self::AlreadyStarted => write!(f, "server already started"),
            Self::NotStarted => write!(f, "server not started"),
            Self::TemplateCollision(t) => write!(f, "template collision: {}", t),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            Self::UrlParseError(msg) => write!(f, "url parse error: {}", msg),
            Self::MethodUnknown(m) => write!(f, "unknown method: {}", m),
            Self::StreamError(err) => write!(f, "stream error: {}", err),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for WaypostError {}

impl From<io::Error> for WaypostError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<AddrParseError> for WaypostError {
    fn from(err: AddrParseError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WaypostError>;
