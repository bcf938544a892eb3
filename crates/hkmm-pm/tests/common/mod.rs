//! Shared fixtures: an in-process artifact server and archive builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use hkmm_pm::event::InstallListener;
use hkmm_pm::ModError;
use tiny_http::{Header, Response, Server, StatusCode};
use zip::write::SimpleFileOptions;

/// Canned response for one path
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            headers: Vec::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error".to_vec(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attachment(self, filename: &str) -> Self {
        self.with_header("Content-Disposition", &format!("attachment; filename=\"{}\"", filename))
    }
}

/// HTTP server on an ephemeral localhost port serving fixed routes.
/// Unknown paths answer 404.
pub struct FakeServer {
    server: Arc<Server>,
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeServer {
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let routes: HashMap<String, Route> = routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let thread_server = Arc::clone(&server);
        let thread_hits = Arc::clone(&hits);
        let handle = std::thread::spawn(move || {
            for request in thread_server.incoming_requests() {
                let path = request.url().to_string();
                thread_hits.lock().unwrap().push(path.clone());

                let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
                let mut response =
                    Response::from_data(route.body).with_status_code(StatusCode(route.status));
                for (name, value) in &route.headers {
                    response.add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
                }
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            base_url: format!("http://{}", addr),
            hits,
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// How many times `path` was requested
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Answer a single request with a `Content-Length` of `declared` bytes,
/// send only `body` and close the connection. Returns the URL to fetch.
pub fn truncated_response(path: &str, declared: usize, body: &'static [u8]) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), path);

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }

        let mut stream = stream;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
    });

    (url, handle)
}

/// Build a zip archive in memory; names ending in `/` become directories
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// One `<Manifest>` element in attribute form
pub fn manifest_entry(name: &str, link: &str, dependencies: &[&str]) -> String {
    let deps: String = dependencies
        .iter()
        .map(|d| format!("<Dependency Name=\"{}\"/>", d))
        .collect();
    format!("<Manifest Name=\"{}\" Link=\"{}\">{}</Manifest>", name, link, deps)
}

pub fn modlinks(entries: &[String]) -> String {
    format!("<?xml version=\"1.0\"?>\n<ModLinks>{}</ModLinks>", entries.concat())
}

pub fn write_modlinks(dir: &Path, entries: &[String]) -> PathBuf {
    let path = dir.join("ModLinks.xml");
    std::fs::write(&path, modlinks(entries)).unwrap();
    path
}

/// Sorted relative paths of every file below `dir`
pub fn file_set(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.push(rel);
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Listener that records every event for assertions
#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<(u64, u64)>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl InstallListener for RecordingListener {
    fn on_download_start(&self, name: &str, _url: &str) {
        self.push(format!("download:{}", name));
    }

    fn on_progress(&self, done: u64, total: u64) {
        self.progress.lock().unwrap().push((done, total));
    }

    fn on_installed(&self, name: &str, _path: &Path) {
        self.push(format!("installed:{}", name));
    }

    fn on_dependency_failed(&self, parent: &str, dependency: &str, _error: &ModError) {
        self.push(format!("warning:{}->{}", parent, dependency));
    }

    fn on_skipped(&self, name: &str) {
        self.push(format!("skipped:{}", name));
    }
}
