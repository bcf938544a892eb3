//! Blocking HTTP client used for mod artifacts, the mod index and the
//! GitHub release API.
//!
//! This module wraps `reqwest::blocking` with:
//! - A custom User-Agent (GitHub rejects anonymous agents)
//! - Connect and overall request timeouts
//! - Streaming body copies with a progress callback
//!
//! Requests are never retried; a failed transfer is reported to the caller,
//! who may simply run the command again.
//!
//! # Examples
//!
//! ```no_run
//! use hkmm_pm::http::HttpClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let index = client.get_bytes("https://example.com/ModLinks.xml")?;
//! println!("{} bytes", index.len());
//! # Ok(())
//! # }
//! ```

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_USER_AGENT: &str = concat!("hkmm/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CHUNK_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} {reason}: {url}")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization error: {0}")]
    JsonParse(String),
}

impl HttpError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::HttpStatus { status, .. } => Some(*status),
            HttpError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short human readable reason without the status code or URL.
    pub fn reason(&self) -> String {
        match self {
            HttpError::HttpStatus { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent,
        })
    }

    /// Perform a GET request, failing on any non-success status
    pub fn get(&self, url: &str) -> Result<Response, HttpError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// GET JSON and deserialize
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let text = self.get(url)?.text()?;

        serde_json::from_str(&text).map_err(|e| HttpError::JsonParse(e.to_string()))
    }

    /// Download to memory
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let bytes = self.get(url)?.bytes()?;
        Ok(bytes.to_vec())
    }

    /// Stream a response body into `writer`, calling `progress(done, total)`
    /// after every chunk. `total` is 0 when the server did not declare a
    /// content length.
    pub fn copy_body<W, F>(
        &self,
        mut response: Response,
        writer: &mut W,
        progress: Option<F>,
    ) -> Result<u64, HttpError>
    where
        W: Write,
        F: Fn(u64, u64),
    {
        let total_size = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let n = response.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
            downloaded += n as u64;

            if let Some(ref callback) = progress {
                callback(downloaded, total_size);
            }
        }

        writer.flush()?;

        Ok(downloaded)
    }

    /// Get the configured user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}
