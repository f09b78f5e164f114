//! Client
//!
//! Blocking client for the score server, used by the CLI binary.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::Result;
use crate::handler::{LEAGUE_PATH, PLAYERS_PREFIX};
use crate::protocol::{percent_encode, read_response, write_request, Request, Response};

/// One keep-alive connection to a score server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a request and wait for its response
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        write_request(&mut self.writer, request)?;
        read_response(&mut self.reader)
    }

    /// `GET /players/{name}`
    pub fn get_score(&mut self, name: &str) -> Result<Response> {
        self.send(&Request::get(player_target(name)))
    }

    /// `POST /players/{name}`
    pub fn record_win(&mut self, name: &str) -> Result<Response> {
        self.send(&Request::post(player_target(name)))
    }

    /// `GET /league`
    pub fn league(&mut self) -> Result<Response> {
        self.send(&Request::get(LEAGUE_PATH))
    }
}

fn player_target(name: &str) -> String {
    format!("{}{}", PLAYERS_PREFIX, percent_encode(name))
}
