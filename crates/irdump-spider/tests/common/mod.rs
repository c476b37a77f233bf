#![allow(dead_code)]

use irdump_spider::extract::Render;
use irdump_spider::fetch::Fetch;
use irdump_spider::publish::Publish;
use irdump_spider::SpiderError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Scratch data root under the OS temp dir, emptied on creation.
pub fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("irdump-it-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// In-memory web: pages and files keyed by absolute URL; anything missing is a failure.
#[derive(Clone, Default)]
pub struct FakeWeb {
    pages: Arc<Mutex<HashMap<String, String>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    panics_on: Arc<Mutex<Option<String>>>,
    /// Every binary request, in order.
    pub binary_requests: Arc<Mutex<Vec<String>>>,
}

impl FakeWeb {
    pub fn page(&self, url: &str, html: &str) -> &Self {
        self.pages.lock().unwrap().insert(url.to_string(), html.to_string());
        self
    }

    pub fn file(&self, url: &str, bytes: &[u8]) -> &Self {
        self.files.lock().unwrap().insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn panic_on(&self, url: &str) -> &Self {
        *self.panics_on.lock().unwrap() = Some(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.binary_requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetch for FakeWeb {
    async fn fetch_page(&self, url: &str) -> Result<String, SpiderError> {
        let crash = self.panics_on.lock().unwrap().as_deref() == Some(url);
        if crash {
            panic!("simulated crash on {url}");
        }
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SpiderError::PageFetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }

    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, SpiderError> {
        self.binary_requests.lock().unwrap().push(url.to_string());
        self.files
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SpiderError::FileDownload {
                url: url.to_string(),
                reason: "connection reset after headers".to_string(),
            })
    }
}

/// Publish hook that remembers what it was handed.
#[derive(Clone, Default)]
pub struct Recorder(pub Arc<Mutex<Vec<PathBuf>>>);

impl Recorder {
    pub fn published(&self) -> Vec<PathBuf> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Publish for Recorder {
    async fn publish(&self, path: &Path) {
        self.0.lock().unwrap().push(path.to_path_buf());
    }
}

/// Renderer returning a fixed set of anchors, or failing, and counting its calls.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    pub hrefs: Vec<String>,
    pub fails: bool,
    pub calls: Arc<Mutex<usize>>,
}

impl FakeBrowser {
    pub fn new(hrefs: &[&str]) -> Self {
        Self {
            hrefs: hrefs.iter().map(|href| href.to_string()).collect(),
            ..Self::default()
        }
    }

    /// A browser whose every render times out.
    pub fn broken() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Render for FakeBrowser {
    fn render_links(&self, url: &str) -> Result<Vec<String>, SpiderError> {
        *self.calls.lock().unwrap() += 1;
        if self.fails {
            return Err(SpiderError::Render {
                url: url.to_string(),
                reason: "timed out waiting for an anchor".to_string(),
            });
        }
        Ok(self.hrefs.clone())
    }
}

/// A canned raw HTTP reply, written in chunks with a pause between them.
#[derive(Clone)]
pub struct Reply {
    chunks: Vec<Vec<u8>>,
    pause: Duration,
}

impl Reply {
    /// A complete response with the given status and body.
    pub fn status(code: u16, body: &[u8]) -> Self {
        Self {
            chunks: vec![[head(code, body.len()), body.to_vec()].concat()],
            pause: Duration::ZERO,
        }
    }

    pub fn ok(body: &[u8]) -> Self {
        Self::status(200, body)
    }

    /// Headers announce `claimed` bytes, but the connection closes after `body`.
    pub fn truncated(claimed: usize, body: &[u8]) -> Self {
        Self {
            chunks: vec![[head(200, claimed), body.to_vec()].concat()],
            pause: Duration::ZERO,
        }
    }

    /// Headers first, then the body after `pause`.
    pub fn slow(body: &[u8], pause: Duration) -> Self {
        Self {
            chunks: vec![head(200, body.len()), body.to_vec()],
            pause,
        }
    }
}

fn head(code: u16, content_length: usize) -> Vec<u8> {
    format!(
        "HTTP/1.1 {code} Status\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    )
    .into_bytes()
}

/// Loopback HTTP/1.1 server answering each request by path; unknown paths get a 404.
pub struct LocalServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl LocalServer {
    pub async fn start(routes: &[(&str, Reply)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .iter()
                .map(|(path, reply)| (path.to_string(), reply.clone()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let mut raw = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !raw.windows(4).any(|window| window == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => raw.extend_from_slice(&buf[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&raw).into_owned();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    seen.lock().unwrap().push(request);

                    let reply = routes
                        .get(&path)
                        .cloned()
                        .unwrap_or_else(|| Reply::status(404, b"not found"));
                    for (i, chunk) in reply.chunks.iter().enumerate() {
                        if i > 0 {
                            tokio::time::sleep(reply.pause).await;
                        }
                        if stream.write_all(chunk).await.is_err() {
                            return;
                        }
                    }
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Raw request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
