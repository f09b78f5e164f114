//! playerscore Server Binary
//!
//! Serves player scores over TCP.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use playerscore::network::Server;
use playerscore::{
    Config, ErrorPolicy, PersistentStore, PlayerHandler, ScoreStore, StoreBackend, VolatileStore,
};
use tracing_subscriber::{fmt, EnvFilter};

/// playerscore Server
#[derive(Parser, Debug)]
#[command(name = "playerscore-server")]
#[command(about = "Tracks player wins and serves them over HTTP")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./game.db")]
    db_path: String,

    /// Keep scores in memory only (nothing is written to disk)
    #[arg(long)]
    volatile: bool,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// How long to wait for the database lock, in milliseconds
    #[arg(long, default_value = "1000")]
    open_timeout_ms: u64,

    /// Answer 500 on store failures instead of logging them
    #[arg(long)]
    strict: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,playerscore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .backend(if args.volatile {
            StoreBackend::Volatile
        } else {
            StoreBackend::Persistent
        })
        .db_path(&args.db_path)
        .open_timeout_ms(args.open_timeout_ms)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .error_policy(if args.strict {
            ErrorPolicy::Strict
        } else {
            ErrorPolicy::Lenient
        })
        .build();

    tracing::info!("playerscore Server v{}", playerscore::VERSION);
    tracing::info!("Backend: {:?}", config.backend);

    let result = match config.backend {
        StoreBackend::Volatile => serve(&config, Arc::new(VolatileStore::new())),
        StoreBackend::Persistent => {
            tracing::info!("Database file: {}", config.db_path.display());
            match PersistentStore::open_with_config(&config) {
                Ok(store) => serve_and_close(&config, store),
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Run the server until Ctrl+C, then close the database
fn serve_and_close(config: &Config, store: PersistentStore) -> playerscore::Result<()> {
    let store = Arc::new(store);
    serve(config, Arc::clone(&store) as Arc<dyn ScoreStore>)?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close(),
        Err(_) => {
            tracing::warn!("Store still referenced at shutdown; relying on drop to close it");
            Ok(())
        }
    }
}

fn serve(config: &Config, store: Arc<dyn ScoreStore>) -> playerscore::Result<()> {
    let handler = PlayerHandler::new(store).with_policy(config.error_policy);
    let server = Server::bind(config.clone(), handler)?;

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.store(true, Ordering::Relaxed);
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    server.run()
}
