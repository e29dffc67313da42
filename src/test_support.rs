// Local one-shot HTTP responder and fixtures for HTTP-backed tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,audience_sheet=debug")),
        )
        .with_test_writer()
        .finish();
    // another test may already have installed one
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Serve a single canned response on an ephemeral port and return its URL.
pub async fn serve_once(status_line: &'static str, body: impl Into<String>) -> Url {
    let body = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut sock, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let _ = sock.read(&mut buf).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });

    Url::parse(&format!("http://{}/gviz/tq?tqx=out:json", addr)).unwrap()
}

/// URL of a port nothing is listening on.
pub async fn refused_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/gviz/tq", addr)).unwrap()
}

/// Minimal gviz response with the given `(province, geo, population, score)` rows.
pub fn gviz_body(rows: &[(&str, &str, &str, &str)]) -> String {
    let rows: Vec<serde_json::Value> = rows
        .iter()
        .map(|(province, geo, population, score)| {
            serde_json::json!({
                "c": [
                    {"v": province},
                    {"v": geo},
                    {"v": population},
                    {"v": score}
                ]
            })
        })
        .collect();
    let body = serde_json::json!({
        "version": "0.6",
        "status": "ok",
        "table": {
            "cols": [
                {"label": "Fresh Expressors Province"},
                {"label": "Geo"},
                {"label": crate::aggregate::fields::FRESH_EXPRESSORS_POPULATION},
                {"label": "  Composite Score"}
            ],
            "rows": rows
        }
    });
    format!(
        "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
        body
    )
}
