//! Loopback HTTP server answering with canned responses, standing in for the archive.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub(crate) struct Canned {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Canned {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub(crate) struct CannedServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Serves `responses` in order, one per connection; the last one repeats.
    pub async fn start(responses: Vec<Canned>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/v1/archive", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((mut stream, _)) = listener.accept().await {
                let canned = responses.get(served).or(responses.last()).cloned();
                served += 1;
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 16 * 1024];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = stream.read(&mut buf[read..]).await?;
                        read += n;
                        if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let head = String::from_utf8_lossy(&buf[..read]);
                    if let Ok(mut log) = log.lock() {
                        log.push(head.lines().next().unwrap_or_default().to_string());
                    }

                    if let Some(canned) = canned {
                        tokio::time::sleep(canned.delay).await;
                        let response = format!(
                            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            canned.status,
                            canned.body.len(),
                            canned.body
                        );
                        stream.write_all(response.as_bytes()).await?;
                    }
                    stream.shutdown().await?;
                    Ok::<(), std::io::Error>(())
                });
            }
        });

        Ok(CannedServer { url, requests })
    }

    /// Request lines received so far, e.g. `GET /v1/archive?latitude=... HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// A well-formed archive body for consecutive days starting at `start` (YYYY-MM-DD).
pub(crate) fn archive_body(start: chrono::NaiveDate, days: usize) -> String {
    let dates: Vec<String> = start
        .iter_days()
        .take(days)
        .map(|d| format!("\"{}\"", d.format("%Y-%m-%d")))
        .collect();
    let series = |base: f64| -> String {
        (0..days)
            .map(|i| format!("{:.1}", base + (i % 10) as f64))
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        concat!(
            r#"{{"latitude":25.25,"longitude":55.25,"timezone":"Asia/Dubai","daily":{{"#,
            r#""time":[{}],"temperature_2m_max":[{}],"temperature_2m_min":[{}],"#,
            r#""precipitation_sum":[{}]}}}}"#
        ),
        dates.join(","),
        series(25.0),
        series(15.0),
        series(0.0)
    )
}
