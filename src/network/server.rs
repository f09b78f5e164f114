//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver};

use crate::config::Config;
use crate::error::Result;
use crate::handler::PlayerHandler;

use super::Connection;

/// How often the accept loop checks the shutdown flag when idle
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accepted connections allowed to wait per worker
const QUEUE_DEPTH_PER_WORKER: usize = 16;

/// TCP server for the score store
///
/// One acceptor (the thread calling `run`) feeds a bounded channel drained
/// by `worker_threads` workers, each serving one connection at a time.
pub struct Server {
    config: Config,
    handler: PlayerHandler,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address from the config
    ///
    /// Binding happens here rather than in `run` so callers can read
    /// `local_addr` (e.g. after binding port 0) before serving.
    pub fn bind(config: Config, handler: PlayerHandler) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            handler,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Flag that stops `run` when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking)
    ///
    /// Returns once shutdown is signalled and every worker has finished its
    /// current connection.
    pub fn run(&self) -> Result<()> {
        let workers = self.config.worker_threads;
        let (tx, rx) = channel::bounded::<TcpStream>(workers * QUEUE_DEPTH_PER_WORKER);

        let handles = (0..workers)
            .map(|id| self.spawn_worker(id, rx.clone()))
            .collect::<Result<Vec<_>>>()?;
        drop(rx);

        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            workers
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Accepted sockets may inherit the listener's non-blocking mode
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    if tx.send(stream).is_err() {
                        tracing::error!("All workers exited, stopping accept loop");
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let handler = self.handler.clone();
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("playerscore-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    let mut connection = match Connection::new(stream, handler.clone()) {
                        Ok(connection) => connection,
                        Err(e) => {
                            tracing::warn!("Failed to set up connection: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
                        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
                        continue;
                    }

                    if let Err(e) = connection.handle() {
                        tracing::debug!("Connection {} ended with error: {}", connection.peer_addr(), e);
                    }
                }
            })?;

        Ok(handle)
    }
}
