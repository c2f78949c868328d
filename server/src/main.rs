use clap::Parser;
use log::info;
use server::network::Server;
use shared::GameConfig;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Tick rate (updates per second)
    #[arg(short, long, default_value = "10")]
    tick_rate: u32,

    /// Maximum number of concurrent clients
    #[arg(long, default_value = "16")]
    max_clients: usize,

    /// Score at which a player immediately wins
    #[arg(long, default_value = "50")]
    target_score: u32,

    /// Rounds played before the highest score wins
    #[arg(long, default_value = "8")]
    max_rounds: u32,

    /// Round setup duration in seconds
    #[arg(long, default_value = "5.0")]
    round_setup_secs: f32,

    /// Clue phase duration in seconds
    #[arg(long, default_value = "30.0")]
    clue_secs: f32,

    /// Guess phase duration in seconds
    #[arg(long, default_value = "60.0")]
    guess_secs: f32,

    /// Scoring phase duration in seconds
    #[arg(long, default_value = "10.0")]
    scoring_secs: f32,

    /// Round end duration in seconds
    #[arg(long, default_value = "5.0")]
    round_end_secs: f32,

    /// Keep the same clue-giver every round
    #[arg(long)]
    no_rotate: bool,

    /// Auto-start with a random clue-giver once this many players joined
    #[arg(long)]
    auto_start: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = GameConfig {
        target_score: args.target_score,
        max_rounds: args.max_rounds,
        round_setup_secs: args.round_setup_secs,
        clue_secs: args.clue_secs,
        guess_secs: args.guess_secs,
        scoring_secs: args.scoring_secs,
        round_end_secs: args.round_end_secs,
        rotate_clue_giver: !args.no_rotate,
    };

    let address = format!("{}:{}", args.host, args.port);
    let tick_duration = Duration::from_secs_f32(1.0 / args.tick_rate as f32);

    info!("Starting session server on {}", address);
    info!(
        "Config: target score {}, max rounds {}, rotation {}",
        config.target_score,
        config.max_rounds,
        if config.rotate_clue_giver { "on" } else { "off" }
    );

    let mut server = Server::new(
        &address,
        config,
        tick_duration,
        args.max_clients,
        args.auto_start,
    )
    .await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
