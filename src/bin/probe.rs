//! brokerwire Probe Client
//!
//! Sends one request header to a server and prints the framed response.

use std::io::{Read, Write};
use std::net::TcpStream;

use clap::Parser;
use brokerwire::protocol::{encode_request_header, to_hex, RequestHeader, API_KEY_API_VERSIONS};

/// brokerwire probe
#[derive(Parser, Debug)]
#[command(name = "brokerwire-probe")]
#[command(about = "Send a single request to a brokerwire server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:9092")]
    server: String,

    /// Api key to request
    #[arg(short = 'k', long, default_value_t = API_KEY_API_VERSIONS)]
    api_key: u16,

    /// Api version to request
    #[arg(short = 'v', long, default_value = "4")]
    api_version: u16,

    /// Correlation id to send
    #[arg(short, long, default_value = "1")]
    correlation_id: u32,

    /// Client id (omit for null)
    #[arg(long)]
    client_id: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = probe(&args) {
        eprintln!("probe failed: {}", e);
        std::process::exit(1);
    }
}

fn probe(args: &Args) -> brokerwire::Result<()> {
    let mut header = RequestHeader::new(args.api_key, args.api_version, args.correlation_id);
    header.client_id = args.client_id.clone();
    let body = encode_request_header(&header);

    let mut stream = TcpStream::connect(&args.server)?;
    stream.write_all(&(body.len() as u32).to_be_bytes())?;
    stream.write_all(&body)?;
    stream.flush()?;

    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix)?;
    let len = u32::from_be_bytes(prefix) as usize;
    let mut rest = vec![0u8; len];
    stream.read_exact(&mut rest)?;

    if rest.len() < 4 {
        println!("length:         {}", len);
        println!("body:           {}", to_hex(&rest));
        return Ok(());
    }

    let (cid, payload) = rest.split_at(4);
    println!("length:         {}", len);
    println!("correlation_id: {}", u32::from_be_bytes([cid[0], cid[1], cid[2], cid[3]]));
    println!("payload:        {}", to_hex(payload));
    Ok(())
}
