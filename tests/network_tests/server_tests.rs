//! Tests for Server and Connection over loopback TCP
//!
//! These tests verify:
//! - ApiVersions and unsupported requests get correct frames
//! - Several requests on one connection are answered in order
//! - Undecodable and oversized requests close the connection silently

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use brokerwire::network::Server;
use brokerwire::protocol::{encode_request_header, RequestHeader};
use brokerwire::config::MIN_FRAME_SIZE;
use brokerwire::{Config, Result, WireError};

fn test_config() -> Config {
    Config::builder()
        .listen_addr("127.0.0.1:0")
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .max_frame_size(1024)
        .build()
}

/// Bind a server and serve exactly one connection on a background thread
fn serve_one() -> (SocketAddr, JoinHandle<Result<()>>) {
    let server = Server::bind(test_config()).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = thread::spawn(move || server.accept_one());
    (addr, handle)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
}

fn send_request(stream: &mut TcpStream, header: &RequestHeader) {
    let body = encode_request_header(header);
    stream.write_all(&(body.len() as u32).to_be_bytes()).unwrap();
    stream.write_all(&body).unwrap();
}

/// Read one response frame, returning (correlation_id, payload)
fn read_response(stream: &mut TcpStream) -> (u32, Vec<u8>) {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).unwrap();
    let len = u32::from_be_bytes(prefix) as usize;

    let mut rest = vec![0u8; len];
    stream.read_exact(&mut rest).unwrap();
    let cid = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
    (cid, rest[4..].to_vec())
}

/// True once the server has closed its side of the connection
fn is_closed(stream: &mut TcpStream) -> bool {
    let mut buf = [0u8; 1];
    matches!(stream.read(&mut buf), Ok(0) | Err(_))
}

const API_VERSIONS_PAYLOAD: [u8; 15] = [
    0x00, 0x00, 0x02, 0x00, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// =============================================================================
// Request/Response
// =============================================================================

#[test]
fn test_api_versions_over_tcp() {
    let (addr, handle) = serve_one();
    let mut stream = connect(addr);

    send_request(&mut stream, &RequestHeader::new(18, 4, 7));
    let (cid, payload) = read_response(&mut stream);

    assert_eq!(cid, 7);
    assert_eq!(payload, API_VERSIONS_PAYLOAD.to_vec());

    drop(stream);
    handle.join().unwrap().unwrap();
}

#[test]
fn test_multiple_requests_one_connection() {
    let (addr, handle) = serve_one();
    let mut stream = connect(addr);

    let requests = [
        RequestHeader::new(18, 0, 1),
        RequestHeader::new(75, 0, 2),
        RequestHeader::new(18, 5, 3).with_client_id("client"),
        RequestHeader::new(18, 3, 4),
    ];

    for request in &requests {
        send_request(&mut stream, request);
        let (cid, payload) = read_response(&mut stream);
        assert_eq!(cid, request.correlation_id);

        if request.api_key == 18 && request.api_version <= 4 {
            assert_eq!(payload, API_VERSIONS_PAYLOAD.to_vec());
        } else {
            assert_eq!(payload, vec![0x00, 0x23]);
        }
    }

    drop(stream);
    handle.join().unwrap().unwrap();
}

#[test]
fn test_request_body_after_header_is_ignored() {
    let (addr, handle) = serve_one();
    let mut stream = connect(addr);

    let mut body = encode_request_header(&RequestHeader::new(18, 4, 11).with_client_id("cli")).to_vec();
    body.extend_from_slice(&[0x04, b'c', b'l', b'i', 0x04, b'1', b'.', b'0', 0x00]);
    stream.write_all(&(body.len() as u32).to_be_bytes()).unwrap();
    stream.write_all(&body).unwrap();

    let (cid, payload) = read_response(&mut stream);
    assert_eq!(cid, 11);
    assert_eq!(payload, API_VERSIONS_PAYLOAD.to_vec());

    drop(stream);
    handle.join().unwrap().unwrap();
}

// =============================================================================
// Failure Handling
// =============================================================================

#[test]
fn test_truncated_header_closes_without_response() {
    let (addr, handle) = serve_one();
    let mut stream = connect(addr);

    // Complete frame whose body stops inside correlation_id
    stream.write_all(&[0x00, 0x00, 0x00, 0x05, 0x00, 0x12, 0x00, 0x04, 0x00]).unwrap();

    assert!(is_closed(&mut stream));
    let result = handle.join().unwrap();
    assert!(matches!(result, Err(WireError::TruncatedHeader { .. })));
}

#[test]
fn test_oversized_frame_closes_connection() {
    let (addr, handle) = serve_one();
    let mut stream = connect(addr);

    stream.write_all(&4096u32.to_be_bytes()).unwrap();

    assert!(is_closed(&mut stream));
    let result = handle.join().unwrap();
    assert!(matches!(result, Err(WireError::InvalidFrameSize { size: 4096, max: 1024 })));
}

#[test]
fn test_client_disconnect_is_clean() {
    let (addr, handle) = serve_one();
    let stream = connect(addr);
    drop(stream);

    handle.join().unwrap().unwrap();
}

// =============================================================================
// Server Lifecycle
// =============================================================================

#[test]
fn test_bind_rejects_invalid_config() {
    let config = Config::builder().listen_addr("127.0.0.1:0").max_frame_size(4).build();
    assert!(matches!(Server::bind(config), Err(WireError::Config(_))));
}

#[test]
fn test_run_serves_connections_until_shutdown() {
    let server = Arc::new(Server::bind(test_config()).unwrap());
    let addr = server.local_addr().unwrap();

    let runner = Arc::clone(&server);
    let handle = thread::spawn(move || runner.run());

    for cid in 1..=2 {
        let mut stream = connect(addr);
        send_request(&mut stream, &RequestHeader::new(18, 4, cid));
        let (got, _) = read_response(&mut stream);
        assert_eq!(got, cid);
    }

    server.shutdown();
    handle.join().unwrap().unwrap();
    assert!(server.shutdown_handle().is_shutdown());
}

#[test]
fn test_shutdown_handle_stops_run_on_moved_server() {
    let server = Server::bind(test_config()).unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle();

    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let result = server.run();
        let _ = done_tx.send(());
        result
    });

    let mut stream = connect(addr);
    send_request(&mut stream, &RequestHeader::new(18, 4, 3));
    assert_eq!(read_response(&mut stream).0, 3);
    drop(stream);

    shutdown.shutdown();
    assert!(shutdown.is_shutdown());
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("run did not return after shutdown");
    handle.join().unwrap().unwrap();
}

#[test]
fn test_validate_max_frame_size_fits_minimal_header() {
    let with_max = |size| Config::builder().listen_addr("127.0.0.1:0").max_frame_size(size).build();

    assert!(matches!(with_max(10).validate(), Err(WireError::Config(_))));
    assert!(with_max(MIN_FRAME_SIZE).validate().is_ok());
    assert_eq!(
        encode_request_header(&RequestHeader::new(18, 4, 1)).len(),
        MIN_FRAME_SIZE as usize
    );
}

#[test]
fn test_smallest_allowed_frame_size_serves_minimal_request() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .read_timeout_ms(5000)
        .max_frame_size(MIN_FRAME_SIZE)
        .build();
    let server = Server::bind(config).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = thread::spawn(move || server.accept_one());

    let mut stream = connect(addr);
    send_request(&mut stream, &RequestHeader::new(18, 4, 11));
    assert_eq!(read_response(&mut stream).0, 11);

    drop(stream);
    handle.join().unwrap().unwrap();
}
