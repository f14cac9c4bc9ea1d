//! Single-threaded HTTP server exposing the network state store.
//!
//! A minimal HTTP/1.1 responder over `std::net::TcpListener`: one request
//! per connection, handled sequentially. The surface is exactly two
//! endpoints, `GET /api/network` and `PUT /api/network`; the store record
//! is owned by the accept loop, so writes need no locking.

use anyhow::Context;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use crate::schema::NetworkState;
use crate::storage::MemStorage;

const API_PATH: &str = "/api/network";

/// The API server: a bound listener plus the store it serves.
pub struct ApiServer {
    listener: TcpListener,
    storage: MemStorage,
}

struct Response {
    status: u16,
    body: String,
}

impl Response {
    fn ok(body: String) -> Self {
        Response { status: 200, body }
    }

    fn json(status: u16, value: serde_json::Value) -> Self {
        Response { status, body: value.to_string() }
    }

    fn internal_error() -> Self {
        Response::json(500, json!({"error": "Internal server error"}))
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

impl ApiServer {
    /// Bind the listener and seed the store with the default network state.
    pub fn bind(addr: &str) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).with_context(|| format!("Failed to bind {}", addr))?;
        Ok(ApiServer {
            listener,
            storage: MemStorage::new(),
        })
    }

    /// The address the listener is actually bound to (useful with port 0).
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr().context("Failed to read listener address")
    }

    /// Accept and serve connections forever, one at a time. Per-connection
    /// failures are logged and do not stop the loop.
    pub fn run(self) -> anyhow::Result<()> {
        let ApiServer { listener, mut storage } = self;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = handle_connection(stream, &mut storage) {
                        log::warn!("Connection error: {}", e);
                    }
                }
                Err(e) => log::warn!("Failed to accept connection: {}", e),
            }
        }
        Ok(())
    }
}

/// Read one request from the stream, dispatch it, and write the response.
fn handle_connection(mut stream: TcpStream, storage: &mut MemStorage) -> anyhow::Result<()> {
    let mut reader = BufReader::new(stream.try_clone().context("Failed to clone stream")?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).context("Failed to read request line")?;
    if request_line.trim().is_empty() {
        // Peer connected and closed without sending a request.
        return Ok(());
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    // Headers: only Content-Length matters for this surface.
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).context("Failed to read header")?;
        if read == 0 || line.trim_end().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).context("Failed to read request body")?;

    let response = route(&method, &path, &body, storage);
    log::info!("{} {} -> {}", method.trim(), path, response.status);

    write_response(&mut stream, &response)
}

fn route(method: &str, path: &str, body: &[u8], storage: &mut MemStorage) -> Response {
    match (method, path) {
        ("GET", API_PATH) => match serde_json::to_string(&storage.get()) {
            Ok(json) => Response::ok(json),
            Err(e) => {
                log::error!("Failed to serialize network state: {}", e);
                Response::internal_error()
            }
        },
        ("PUT", API_PATH) => update_network_state(body, storage),
        (_, API_PATH) => Response::json(405, json!({"error": "Method not allowed"})),
        _ => Response::json(404, json!({"error": "Not found"})),
    }
}

/// `PUT /api/network`: parse, validate, replace the stored record, echo it.
fn update_network_state(body: &[u8], storage: &mut MemStorage) -> Response {
    let state: NetworkState = match serde_json::from_slice(body) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Rejected unparseable network state: {}", e);
            return Response::json(400, json!({"error": "Malformed request body", "details": e.to_string()}));
        }
    };

    if let Err(validation) = state.validate() {
        log::warn!("Rejected network state update: {}", validation);
        return Response::json(
            400,
            json!({"error": "Invalid network state", "details": validation.errors}),
        );
    }

    let stored = storage.set(state);
    match serde_json::to_string(&stored) {
        Ok(json) => Response::ok(json),
        Err(e) => {
            log::error!("Failed to serialize stored state: {}", e);
            Response::internal_error()
        }
    }
}

fn write_response(stream: &mut TcpStream, response: &Response) -> anyhow::Result<()> {
    let body = response.body.as_bytes();
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        status_text(response.status),
        body.len()
    )
    .context("Failed to write response head")?;
    stream.write_all(body).context("Failed to write response body")?;
    stream.flush().context("Failed to flush response")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Shutdown;
    use std::thread;

    fn spawn_server() -> SocketAddr {
        let server = ApiServer::bind("127.0.0.1:0").expect("bind test server");
        let addr = server.local_addr().expect("local addr");
        thread::spawn(move || {
            let _ = server.run();
        });
        addr
    }

    fn send_raw(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("connect to test server");
        stream.write_all(raw.as_bytes()).expect("send request");
        stream.shutdown(Shutdown::Write).expect("half-close");
        let mut response = String::new();
        stream.read_to_string(&mut response).expect("read response");
        response
    }

    fn body_of(response: &str) -> &str {
        response.split("\r\n\r\n").nth(1).expect("response has a body")
    }

    fn put_request(state: &NetworkState) -> String {
        let body = serde_json::to_string(state).unwrap();
        format!(
            "PUT /api/network HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn get_returns_the_default_state() {
        let addr = spawn_server();
        let response = send_raw(addr, "GET /api/network HTTP/1.1\r\nHost: test\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);

        let state: NetworkState = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(state.settings.ssid, "MyWiFiNetwork");
        assert_eq!(state.devices.len(), 2);
    }

    #[test]
    fn put_replaces_the_stored_state_and_echoes_it() {
        let addr = spawn_server();
        let mut state = MemStorage::new().get();
        state.settings.ssid = "Renamed".to_string();
        state.devices.clear();

        let response = send_raw(addr, &put_request(&state));
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        let echoed: NetworkState = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(echoed, state);

        let response = send_raw(addr, "GET /api/network HTTP/1.1\r\nHost: test\r\n\r\n");
        let fetched: NetworkState = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(fetched, state);
    }

    #[test]
    fn put_with_illegal_channel_is_rejected_with_details() {
        let addr = spawn_server();
        let mut state = MemStorage::new().get();
        state.settings.channel = 14;

        let response = send_raw(addr, &put_request(&state));
        assert!(response.starts_with("HTTP/1.1 400"), "{}", response);
        assert!(body_of(&response).contains("settings.channel"), "{}", response);

        // The rejected update must not reach the store.
        let response = send_raw(addr, "GET /api/network HTTP/1.1\r\nHost: test\r\n\r\n");
        let fetched: NetworkState = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(fetched.settings.channel, 6);
    }

    #[test]
    fn put_with_malformed_json_is_a_bad_request() {
        let addr = spawn_server();
        let response = send_raw(
            addr,
            "PUT /api/network HTTP/1.1\r\nHost: test\r\nContent-Length: 9\r\n\r\nnot json!",
        );
        assert!(response.starts_with("HTTP/1.1 400"), "{}", response);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let addr = spawn_server();
        let response = send_raw(addr, "GET /api/devices HTTP/1.1\r\nHost: test\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 404"), "{}", response);
    }

    #[test]
    fn unsupported_methods_are_rejected() {
        let addr = spawn_server();
        let response = send_raw(
            addr,
            "POST /api/network HTTP/1.1\r\nHost: test\r\nContent-Length: 2\r\n\r\n{}",
        );
        assert!(response.starts_with("HTTP/1.1 405"), "{}", response);
    }
}
