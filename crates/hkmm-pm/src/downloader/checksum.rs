//! Checksum verification for downloaded artifacts.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{ModError, Result};

/// Compute the lowercase hex SHA-256 of a file
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that the file at `path` hashes to `expected` (hex, any case)
pub fn verify_sha256(path: &Path, expected: &str, url: &str) -> Result<()> {
    let actual = compute_sha256(path)?;

    if actual.eq_ignore_ascii_case(expected.trim()) {
        log::debug!("Checksum verified for {}", url);
        Ok(())
    } else {
        Err(ModError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.trim().to_lowercase(),
            actual,
        })
    }
}
