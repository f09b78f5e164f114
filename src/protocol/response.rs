//! Response definitions
//!
//! Represents responses to clients.

use std::borrow::Cow;

use bytes::Bytes;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    Ok = 200,
    Accepted = 202,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl Status {
    /// Numeric status code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Reason phrase for the status line
    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Accepted => "Accepted",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::InternalServerError => "Internal Server Error",
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Status::Ok),
            202 => Some(Status::Accepted),
            400 => Some(Status::BadRequest),
            404 => Some(Status::NotFound),
            405 => Some(Status::MethodNotAllowed),
            500 => Some(Status::InternalServerError),
            _ => None,
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Content-Type header, if any
    pub content_type: Option<String>,

    /// Body (decimal score for GET, JSON for the league, error text otherwise)
    pub body: Bytes,
}

impl Response {
    /// Create a response with a plain-text body
    pub fn text(status: Status, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            body: Bytes::from(body.into()),
        }
    }

    /// Create a response with no body
    pub fn empty(status: Status) -> Self {
        Self {
            status,
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Create a 200 response carrying JSON
    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body),
        }
    }

    /// Create a 202 response
    pub fn accepted() -> Self {
        Self::empty(Status::Accepted)
    }

    /// Create a 404 response
    pub fn not_found() -> Self {
        Self::empty(Status::NotFound)
    }

    /// Create a 405 response
    pub fn method_not_allowed() -> Self {
        Self::empty(Status::MethodNotAllowed)
    }

    /// Create a 400 response
    pub fn bad_request(message: &str) -> Self {
        Self::text(Status::BadRequest, message)
    }

    /// Create a 500 response
    pub fn internal_error(message: &str) -> Self {
        Self::text(Status::InternalServerError, message)
    }

    /// Body as text (lossy)
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
