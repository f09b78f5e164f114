//! Request definitions
//!
//! Represents requests from clients.

use bytes::Bytes;

use crate::error::{Result, ScoreError};

/// Request methods the server distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Read a score
    Get,

    /// Record a win
    Post,

    /// Anything else, kept verbatim so it can be echoed in logs
    Other(String),
}

impl Method {
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(token) => token,
        }
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,

    /// Request target as sent: path plus optional `?query`
    pub target: String,

    /// Header lines in arrival order (Content-Length excluded)
    pub headers: Vec<(String, String)>,

    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post, target)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Target with any query string removed
    pub fn path(&self) -> &str {
        match self.target.split_once('?') {
            Some((path, _)) => path,
            None => &self.target,
        }
    }

    /// First header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the client asked for the connection to end after this request
    pub fn wants_close(&self) -> bool {
        self.header("Connection")
            .map(|v| v.eq_ignore_ascii_case("close"))
            .unwrap_or(false)
    }
}

/// Decode `%XX` escapes in a path
///
/// Malformed escapes are kept as-is. Escapes that decode to invalid UTF-8
/// are rejected, so distinct byte sequences never collapse into one name.
pub fn percent_decode(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).map_err(|e| {
        ScoreError::Protocol(format!(
            "Escaped path {:?} is not valid UTF-8 at byte {}",
            input,
            e.utf8_error().valid_up_to()
        ))
    })
}

/// Escape everything outside the unreserved set so a name fits in one path segment
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
