//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rollout_verifier::config::SourceConfig;
use rollout_verifier::PrometheusSource;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Prometheus vector response carrying a single value.
pub fn vector(value: f64) -> String {
    format!(
        r#"{{"status":"success","data":{{"resultType":"vector","result":[{{"metric":{{}},"value":[1700000000.0,"{}"]}}]}}}}"#,
        value
    )
}

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the decoded request target and returns a status code
/// and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let target = read_request_target(&mut socket).await;
                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            422 => "422 Unprocessable Entity",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that answers total and 5xx queries with fixed counts.
#[allow(dead_code)]
pub async fn start_counts_backend(total: f64, errors: f64) -> SocketAddr {
    start_programmable_backend(move |target| async move {
        if is_error_query(&target) {
            (200, vector(errors))
        } else {
            (200, vector(total))
        }
    })
    .await
}

/// Whether the request asks for 5xx responses only.
pub fn is_error_query(target: &str) -> bool {
    target.contains("5..")
}

/// A source pointed at `addr` that bypasses any system proxy.
pub fn source_for(addr: SocketAddr) -> PrometheusSource {
    let config = SourceConfig {
        url: format!("http://{}", addr),
        timeout: Duration::from_secs(2),
        ..SourceConfig::default()
    };
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .no_proxy()
        .build()
        .unwrap();
    PrometheusSource::with_client(config, client).unwrap()
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default();
    percent_decode(target)
}

fn percent_decode(target: &str) -> String {
    match url::Url::parse(&format!("http://mock{}", target)) {
        Ok(url) => {
            let params: Vec<String> = url
                .query_pairs()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{}?{}", url.path(), params.join("&"))
        }
        Err(_) => target.to_string(),
    }
}
