//! HTTP artwork fetching

use crate::artwork::ArtworkFetcher;
use crate::media::MediaError;
use reqwest::blocking::Client;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Largest artwork body accepted from a URL
pub const MAX_ARTWORK_BYTES: u64 = 16 * 1024 * 1024;

/// Fetches artwork over HTTP(S) with a blocking client
///
/// A client is built per fetch: a blocking client must not be dropped on an
/// async runtime thread, and the controller may be.
#[derive(Debug, Clone)]
pub struct HttpArtworkFetcher {
    timeout: Duration,
    max_bytes: u64,
}

impl Default for HttpArtworkFetcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: MAX_ARTWORK_BYTES,
        }
    }
}

impl HttpArtworkFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time allowed per request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Body size limit
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl ArtworkFetcher for HttpArtworkFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let fail = |e: reqwest::Error| MediaError::Fetch(format!("{url}: {e}"));

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("totem/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(fail)?;
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fail)?;

        let too_large = || MediaError::Fetch(format!("{url}: body over {} bytes", self.max_bytes));
        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        response.take(self.max_bytes + 1).read_to_end(&mut bytes)?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(too_large());
        }

        debug!(url, len = bytes.len(), "Fetched artwork");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Answer one request on a local port with `status` and `body`
    ///
    /// Write errors are ignored since the client may hang up early.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/art.png", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        });
        (url, handle)
    }

    #[test]
    fn test_fetch_body() {
        let (url, server) = serve_once("200 OK", b"\x89PNG fake".to_vec());
        let bytes = HttpArtworkFetcher::new().fetch(&url).unwrap();
        assert_eq!(bytes, b"\x89PNG fake");
        server.join().unwrap();
    }

    #[test]
    fn test_error_status_fails() {
        let (url, server) = serve_once("404 Not Found", b"missing".to_vec());
        assert!(matches!(
            HttpArtworkFetcher::new().fetch(&url),
            Err(MediaError::Fetch(_))
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_oversized_body_fails() {
        let (url, server) = serve_once("200 OK", vec![0u8; 64]);
        let fetcher = HttpArtworkFetcher::new().with_max_bytes(16);
        assert!(matches!(fetcher.fetch(&url), Err(MediaError::Fetch(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_host_fails() {
        let fetcher = HttpArtworkFetcher::new().with_timeout(Duration::from_millis(500));
        assert!(matches!(
            fetcher.fetch("http://127.0.0.1:1/nothing.png"),
            Err(MediaError::Fetch(_))
        ));
    }
}
