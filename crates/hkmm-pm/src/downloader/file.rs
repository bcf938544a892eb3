//! Artifact fetcher: streams a remote file into a scoped temporary directory.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use tempfile::TempDir;

use crate::http::{HttpClient, HttpError};
use crate::{ModError, Result};

/// Filename used when neither the response nor the URL names the artifact
pub const FALLBACK_FILENAME: &str = "mod";

/// A downloaded artifact.
///
/// The file lives in a private temporary directory that is removed when
/// this value is dropped.
#[derive(Debug)]
pub struct FetchedArtifact {
    _dir: TempDir,
    path: PathBuf,
    filename: String,
    size: u64,
}

impl FetchedArtifact {
    /// Local path of the downloaded file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename declared by the server (or derived from the URL)
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Number of bytes written
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Fetches mod artifacts over HTTP
pub struct ArtifactFetcher {
    http_client: Arc<HttpClient>,
}

impl ArtifactFetcher {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    /// Download `url` into a fresh temporary directory.
    ///
    /// `progress(done, total)` is called as bytes arrive; `total` is 0 when
    /// the content length is unknown.
    pub fn fetch<F>(&self, url: &str, progress: Option<F>) -> Result<FetchedArtifact>
    where
        F: Fn(u64, u64),
    {
        let fail = |e: HttpError| ModError::DownloadFailed {
            url: url.to_string(),
            status: e.status(),
            reason: e.reason(),
        };

        let response = self.http_client.get(url).map_err(fail)?;
        let filename = declared_filename(response.headers(), response.url().as_str());

        let dir = tempfile::Builder::new().prefix("hkmm-").tempdir()?;
        let path = dir.path().join(&filename);
        log::debug!("Downloading {} to {}", url, path.display());

        let mut writer = BufWriter::new(File::create(&path)?);
        let size = self
            .http_client
            .copy_body(response, &mut writer, progress)
            .map_err(fail)?;
        drop(writer);

        log::info!("Downloaded {} ({} bytes)", filename, size);

        Ok(FetchedArtifact {
            _dir: dir,
            path,
            filename,
            size,
        })
    }
}

/// Determine the artifact's filename from the response headers, falling
/// back to the last URL path segment and finally to [`FALLBACK_FILENAME`].
pub fn declared_filename(headers: &HeaderMap, url: &str) -> String {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_disposition)
        .or_else(|| filename_from_url(url))
        .and_then(|name| sanitize_filename(&name))
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Extract the filename parameter of a `Content-Disposition` value.
///
/// RFC 5987 `filename*=` takes precedence over plain `filename=`.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = raw.trim().splitn(3, '\'').last().unwrap_or_default();
                extended = urlencoding::decode(encoded).ok().map(|s| s.into_owned());
            }
            "filename" => {
                plain = Some(raw.trim().trim_matches('"').to_string());
            }
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// Reduce a server supplied name to a bare file name
fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}
