//! playerscore CLI
//!
//! Talks to a running server, or plays a local game of poker against a
//! database file.

use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use playerscore::network::Client;
use playerscore::poker::{Game, ScheduledAlerter};
use playerscore::protocol::Response;
use playerscore::{PersistentStore, ScoreStore};
use tracing_subscriber::{fmt, EnvFilter};

/// playerscore CLI
#[derive(Parser, Debug)]
#[command(name = "playerscore-cli")]
#[command(about = "CLI for the playerscore server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a player's score
    Score {
        /// Player name
        name: String,
    },

    /// Record a win for a player
    Win {
        /// Player name
        name: String,
    },

    /// Show every player's wins as JSON
    League,

    /// Play a game locally: blinds go up every 10 minutes, then type "<name> wins"
    Play {
        /// Database file to record the winner in
        #[arg(short, long, default_value = "./game.db")]
        db_path: String,

        /// How long to wait for the database lock, in milliseconds
        #[arg(long, default_value = "1000")]
        open_timeout_ms: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> playerscore::Result<()> {
    match args.command {
        Commands::Score { name } => print_response(Client::connect(&args.server)?.get_score(&name)?),
        Commands::Win { name } => print_response(Client::connect(&args.server)?.record_win(&name)?),
        Commands::League => print_response(Client::connect(&args.server)?.league()?),
        Commands::Play {
            db_path,
            open_timeout_ms,
        } => play(&db_path, open_timeout_ms),
    }
}

fn play(db_path: &str, open_timeout_ms: u64) -> playerscore::Result<()> {
    let store = Arc::new(PersistentStore::open(
        db_path,
        std::time::Duration::from_millis(open_timeout_ms),
    )?);
    let alerter = Arc::new(ScheduledAlerter::new(io::stdout()));

    println!("Let's play poker");
    println!("Type \"{{Name}} wins\" to record a win");

    let winner = {
        let mut game = Game::new(
            Arc::clone(&store) as Arc<dyn ScoreStore>,
            io::stdin().lock(),
            alerter,
        );
        game.play()?
    };
    println!("{} has {} wins", winner, store.get_score(&winner)?);

    match Arc::try_unwrap(store) {
        Ok(store) => store.close(),
        Err(_) => Ok(()),
    }
}

fn print_response(response: Response) -> playerscore::Result<()> {
    println!("{} {}", response.status.code(), response.status.reason());
    if !response.body.is_empty() {
        println!("{}", response.body_text());
    }
    Ok(())
}
