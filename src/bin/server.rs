//! brokerwire Server Binary
//!
//! Starts the TCP server for brokerwire.

use clap::Parser;
use brokerwire::Config;
use brokerwire::network::Server;
use tracing_subscriber::{fmt, EnvFilter};

/// brokerwire Server
#[derive(Parser, Debug)]
#[command(name = "brokerwire-server")]
#[command(about = "Answers Kafka-style ApiVersions requests")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:9092")]
    listen: String,

    /// Largest accepted request frame in bytes
    #[arg(short, long, default_value = "1048576")]
    max_frame_size: u32,

    /// Read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "30000")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,brokerwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("brokerwire Server v{}", brokerwire::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_frame_size(args.max_frame_size)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
