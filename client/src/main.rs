mod network;
mod replica;

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Display name to register with
    #[arg(short = 'n', long, default_value = "player")]
    name: String,

    /// Simulate network latency in milliseconds
    #[arg(short = 'l', long, default_value = "0")]
    fake_ping: u64,

    /// Connect as a spectator without joining the player roster
    #[arg(long)]
    spectate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    if args.fake_ping > 0 {
        info!("Simulating {}ms latency", args.fake_ping);
    }
    info!("Commands: join, leave, start <name>, advance, award <name> <delta>, status, quit");

    let mut client = network::Client::new(
        &args.server,
        &args.name,
        args.fake_ping,
        !args.spectate,
    )
    .await?;

    client.run().await?;

    Ok(())
}
