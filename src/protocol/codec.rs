//! Protocol codec
//!
//! Encoding and decoding functions for the text protocol.
//!
//! The `read_*` functions are the primitives: they consume exactly one
//! message from a buffered stream, so a connection can carry several
//! requests back to back. `decode_*` run the same parser over a byte slice.
//!
//! Bodies are always framed by `Content-Length`. Chunked transfer encoding
//! is rejected.

use std::fmt::Write as _;
use std::io::{self, BufRead, Read, Write};

use bytes::Bytes;

use crate::error::{Result, ScoreError};

use super::{Method, Request, Response, Status};

/// Maximum size of the request/status line plus headers (8 KB)
pub const MAX_HEADER_SIZE: usize = 8 * 1024;

/// Maximum body size (1 MB)
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

const HTTP_VERSION: &str = "HTTP/1.1";

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut head = format!(
        "{} {} {}\r\n",
        request.method.as_str(),
        request.target,
        HTTP_VERSION
    );
    push_headers(&mut head, &request.headers);
    let _ = write!(head, "Content-Length: {}\r\n\r\n", request.body.len());

    let mut message = head.into_bytes();
    message.extend_from_slice(&request.body);
    message
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let mut reader = bytes;
    read_request(&mut reader)
}

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs.
/// End of stream before the first byte surfaces as `UnexpectedEof`.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request> {
    let head = read_head(reader)?;

    let parts: Vec<&str> = head[0].split_whitespace().collect();
    let (method, target, version) = match parts.as_slice() {
        [method, target, version] => (*method, *target, *version),
        _ => {
            return Err(ScoreError::Protocol(format!(
                "Malformed request line: {:?}",
                head[0]
            )))
        }
    };

    check_version(version)?;

    if !target.starts_with('/') {
        return Err(ScoreError::Protocol(format!(
            "Request target must be an absolute path, got {:?}",
            target
        )));
    }

    let mut headers = parse_headers(&head[1..])?;
    let body = read_body(reader, &mut headers)?;

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        headers,
        body,
    })
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut head = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        response.status.code(),
        response.status.reason()
    );
    if let Some(content_type) = &response.content_type {
        let _ = write!(head, "Content-Type: {}\r\n", content_type);
    }
    let _ = write!(head, "Content-Length: {}\r\n\r\n", response.body.len());

    let mut message = head.into_bytes();
    message.extend_from_slice(&response.body);
    message
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let mut reader = bytes;
    read_response(&mut reader)
}

/// Read a complete response from a stream
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let head = read_head(reader)?;

    let mut parts = head[0].splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    check_version(version)?;

    let code = parts
        .next()
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| ScoreError::Protocol(format!("Malformed status line: {:?}", head[0])))?;
    let status = Status::from_code(code)
        .ok_or_else(|| ScoreError::Protocol(format!("Unknown response status: {}", code)))?;

    let mut headers = parse_headers(&head[1..])?;
    let body = read_body(reader, &mut headers)?;
    let content_type = find_header(&headers, "Content-Type").map(str::to_string);

    Ok(Response {
        status,
        content_type,
        body,
    })
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Read the start line and headers up to the blank line
///
/// Returns at least one line. Blank lines before the start line are skipped.
fn read_head<R: BufRead>(reader: &mut R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut consumed = 0usize;

    loop {
        let mut line = Vec::new();
        let budget = (MAX_HEADER_SIZE - consumed) as u64;
        let read = reader.by_ref().take(budget).read_until(b'\n', &mut line)?;
        consumed += read;

        if line.last() != Some(&b'\n') {
            if consumed >= MAX_HEADER_SIZE {
                return Err(ScoreError::Protocol(format!(
                    "Header section exceeds {} bytes",
                    MAX_HEADER_SIZE
                )));
            }
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        let line = String::from_utf8(line)
            .map_err(|_| ScoreError::Protocol("Header is not valid UTF-8".to_string()))?;

        if line.is_empty() {
            if lines.is_empty() {
                continue;
            }
            return Ok(lines);
        }
        lines.push(line);
    }
}

fn check_version(version: &str) -> Result<()> {
    if version.starts_with("HTTP/1.") {
        Ok(())
    } else {
        Err(ScoreError::Protocol(format!(
            "Unsupported protocol version: {:?}",
            version
        )))
    }
}

fn parse_headers(lines: &[String]) -> Result<Vec<(String, String)>> {
    lines
        .iter()
        .map(|line| -> Result<(String, String)> {
            let (name, value) = line
                .split_once(':')
                .filter(|(name, _)| !name.trim().is_empty())
                .ok_or_else(|| ScoreError::Protocol(format!("Malformed header: {:?}", line)))?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Read the body announced by Content-Length and drop that header
fn read_body<R: Read>(reader: &mut R, headers: &mut Vec<(String, String)>) -> Result<Bytes> {
    if find_header(headers, "Transfer-Encoding").is_some() {
        return Err(ScoreError::Protocol(
            "Transfer-Encoding is not supported".to_string(),
        ));
    }

    let body_len = content_length(headers)?;

    if body_len > MAX_BODY_SIZE {
        return Err(ScoreError::Protocol(format!(
            "Body too large: {} bytes (max {})",
            body_len, MAX_BODY_SIZE
        )));
    }

    headers.retain(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"));

    let mut body = vec![0u8; body_len];
    if body_len > 0 {
        reader.read_exact(&mut body)?;
    }
    Ok(Bytes::from(body))
}

/// Declared body length, 0 when absent
///
/// Repeated headers must all carry the same value.
fn content_length(headers: &[(String, String)]) -> Result<usize> {
    let mut declared: Option<usize> = None;

    for (_, value) in headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
    {
        let len = value
            .parse::<usize>()
            .map_err(|_| ScoreError::Protocol(format!("Invalid Content-Length: {:?}", value)))?;

        match declared {
            Some(previous) if previous != len => {
                return Err(ScoreError::Protocol(format!(
                    "Conflicting Content-Length values: {} and {}",
                    previous, len
                )))
            }
            _ => declared = Some(len),
        }
    }

    Ok(declared.unwrap_or(0))
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn push_headers(head: &mut String, headers: &[(String, String)]) {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }
        let _ = write!(head, "{}: {}\r\n", name, value);
    }
}
