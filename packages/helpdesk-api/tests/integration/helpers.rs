//! Server setup and a minimal HTTP/1.1 client.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use helpdesk_api::{serve_listener, Router};
use helpdesk_core::config::DeskConfig;
use helpdesk_core::store::RecordStore;
use helpdesk_core::{fixtures, Site};

pub const AGENT: &str = "agent@example.com";

/// Running server; dropping it stops the accept loop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub site: Site,
    _shutdown: oneshot::Sender<()>,
}

/// Starts a server over a fixture site with one agent and three tickets.
pub async fn start_server() -> TestServer {
    let config = DeskConfig::default();
    let site = Site::new(&config);
    fixtures::install(&site).unwrap();
    site.permissions.assign_role(AGENT, "Agent").unwrap();
    for (name, status) in [("1", "Open"), ("2", "Closed"), ("3", "Open")] {
        let record = serde_json::json!({
            "name": name,
            "subject": format!("Ticket {}", name),
            "status": status,
            "raised_by": "customer@example.com",
        });
        site.database
            .insert("HD Ticket", record.as_object().cloned().unwrap())
            .unwrap();
    }

    let router = Router::new(site.services(), Arc::new(config)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        serve_listener(listener, Arc::new(router), shutdown)
            .await
            .unwrap();
    });

    TestServer {
        addr,
        site,
        _shutdown: tx,
    }
}

/// Status and parsed JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: Value,
}

/// Sends one request and reads the whole response.
pub async fn send(
    addr: SocketAddr,
    method: &str,
    target: &str,
    user: Option<&str>,
    body: Option<&str>,
) -> TestResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n",
        method, target, addr
    );
    if let Some(user) = user {
        request.push_str(&format!("x-helpdesk-user: {}\r\n", user));
    }
    let body = body.unwrap_or("");
    request.push_str(&format!(
        "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    ));
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();
    let (head, payload) = raw.split_once("\r\n\r\n").unwrap();
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap();
    let body = if payload.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(payload).unwrap()
    };
    TestResponse { status, body }
}
