//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wasm_devserver::config::ServerConfig;
use wasm_devserver::http::HttpServer;
use wasm_devserver::lifecycle::Shutdown;

/// What a mock upstream answers with.
#[derive(Clone)]
pub struct MockReply {
    /// Status code and reason, e.g. "404 Not Found".
    pub status_line: &'static str,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl MockReply {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_line: "200 OK",
            content_type: Some(content_type),
            body: body.into(),
        }
    }

    pub fn status(status_line: &'static str) -> Self {
        Self {
            status_line,
            content_type: Some("text/plain"),
            body: status_line.as_bytes().to_vec(),
        }
    }
}

/// A running mock upstream that records what it received.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request heads received so far, lower-cased.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

/// Start a mock upstream that answers every request with `reply`.
pub async fn start_upstream(reply: MockReply) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let (h, r) = (hits.clone(), requests.clone());
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let (h, r, reply) = (h.clone(), r.clone(), reply.clone());
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                h.fetch_add(1, Ordering::SeqCst);
                r.lock().unwrap().push(head);

                let mut out = format!("HTTP/1.1 {}\r\n", reply.status_line);
                if let Some(ct) = reply.content_type {
                    out.push_str(&format!("Content-Type: {ct}\r\n"));
                }
                out.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    reply.body.len()
                ));
                let mut bytes = out.into_bytes();
                bytes.extend_from_slice(&reply.body);

                let _ = socket.write_all(&bytes).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream { addr, hits, requests }
}

/// Start an upstream that accepts connections and never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_head(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A config rooted at `root` that ignores any proxy in the environment.
pub fn test_config(root: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1".parse().unwrap();
    config.listener.port = 0;
    config.static_files.root = root.to_path_buf();
    config.proxy.use_system_proxy = false;
    config
}

/// Start the dev server on an ephemeral port.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let signal = shutdown.signal();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

/// Send `GET <target>` exactly as written and return the whole response text.
///
/// Bypasses client-side URL normalisation, which would rewrite the target.
pub async fn raw_get(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Assert both isolation headers are present exactly once with the right values.
pub fn assert_isolated(headers: &reqwest::header::HeaderMap) {
    let coop: Vec<_> = headers.get_all("cross-origin-opener-policy").iter().collect();
    let coep: Vec<_> = headers.get_all("cross-origin-embedder-policy").iter().collect();
    assert_eq!(coop, vec!["same-origin"], "COOP must appear exactly once");
    assert_eq!(coep, vec!["require-corp"], "COEP must appear exactly once");
}

static SITE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Create a fresh build directory with a few files in it.
pub fn temp_site() -> PathBuf {
    let n = SITE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let root = std::env::temp_dir().join(format!(
        "wasm-devserver-test-{}-{}",
        std::process::id(),
        n
    ));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("index.html"), "<!doctype html><title>app</title>").unwrap();
    std::fs::write(root.join("app.wasm"), [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00]).unwrap();
    std::fs::write(root.join("assets").join("index.html"), "assets").unwrap();
    root
}
