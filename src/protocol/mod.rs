//! Protocol Module
//!
//! Defines the text protocol spoken between clients and the score server.
//! It is a strict subset of HTTP/1.1: enough for curl and browsers to talk
//! to the server, nothing more.
//!
//! ## Request Format
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ METHOD SP target SP HTTP/1.1 CRLF           │
//! │ Header-Name: value CRLF       (0..n lines)  │
//! │ CRLF                                        │
//! │ body                 (Content-Length bytes) │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Response Format
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ HTTP/1.1 SP code SP reason CRLF             │
//! │ Content-Length: n CRLF                      │
//! │ Content-Type: type CRLF          (optional) │
//! │ CRLF                                        │
//! │ body                                        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Status Codes
//! - 200 OK, 202 Accepted
//! - 400 Bad Request, 404 Not Found, 405 Method Not Allowed
//! - 500 Internal Server Error

mod codec;
mod request;
mod response;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, MAX_BODY_SIZE, MAX_HEADER_SIZE,
};
pub use request::{percent_decode, percent_encode, Method, Request};
pub use response::{Response, Status};
