//! Transport boundary — where rendered bytes and failure statuses go.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

/// Terminal status a sink can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    NotFound,
    ServerError,
}

impl Status {
    /// HTTP-style numeric code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NotFound => 404,
            Status::ServerError => 500,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ok => "ok",
            Status::NotFound => "not found",
            Status::ServerError => "server error",
        };
        write!(f, "{} {}", self.code(), label)
    }
}

/// Byte-stream write target that can also carry a status.
///
/// A failure status is always sent before any bytes; no caller in this
/// crate writes partial output and then fails.
pub trait ResponseSink: Write {
    fn send_status(&mut self, status: Status);
}

/// Request-derived context handed to the content hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        RequestContext {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// In-memory [`ResponseSink`].
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    status: Option<Status>,
    body: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status explicitly sent, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Status a transport would report: the sent one, else `Ok`.
    pub fn effective_status(&self) -> Status {
        self.status.unwrap_or(Status::Ok)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseSink for BufferSink {
    fn send_status(&mut self, status: Status) {
        self.status = Some(status);
    }
}
