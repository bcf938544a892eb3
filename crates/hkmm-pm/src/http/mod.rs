//! HTTP transport.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
